use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::contract::model::{NewOrder, Order, OrderStatus, PaymentMethod};
use crate::domain::cart::CartStore;
use crate::domain::error::DomainError;
use crate::domain::ports::{CollectionPort, Notifier};

/// Delivery contact form. Name, phone and address are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_email: String,
    pub special_instructions: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("customer_name", &self.customer_name),
            ("customer_phone", &self.customer_phone),
            ("customer_address", &self.customer_address),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(field, "is required"));
            }
        }
        let email = self.customer_email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err(DomainError::validation(
                "customer_email",
                format!("'{email}' is not an email address"),
            ));
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Turns the cart and the contact form into one order record.
#[derive(Clone)]
pub struct OrderSubmission {
    orders: Arc<dyn CollectionPort<Order>>,
    notifier: Arc<dyn Notifier>,
}

impl OrderSubmission {
    pub fn new(orders: Arc<dyn CollectionPort<Order>>, notifier: Arc<dyn Notifier>) -> Self {
        Self { orders, notifier }
    }

    /// Build the order draft: a copy of the cart lines, the cart total, cash on delivery, pending.
    pub fn draft(cart: &CartStore, form: &ContactForm) -> NewOrder {
        let email = form.customer_email.trim();
        NewOrder {
            customer_name: form.customer_name.trim().to_string(),
            customer_phone: form.customer_phone.trim().to_string(),
            customer_address: form.customer_address.trim().to_string(),
            customer_email: (!email.is_empty()).then(|| email.to_string()),
            special_instructions: form.special_instructions.trim().to_string(),
            order_items: cart.items().to_vec(),
            total_amount: cart.total(),
            payment_method: PaymentMethod::CashOnDelivery,
            status: OrderStatus::Pending,
        }
    }

    /// Submit the cart as one order.
    ///
    /// Validation failures return before any backend call. On success the cart and the
    /// form are cleared; on failure both are left as they were so the customer can retry.
    #[instrument(
        name = "feast.checkout.submit",
        skip_all,
        fields(items = cart.items().len(), total = %cart.total())
    )]
    pub async fn submit(
        &self,
        cart: &mut CartStore,
        form: &mut ContactForm,
    ) -> Result<Option<Order>, DomainError> {
        if cart.is_empty() {
            self.notifier.error("Your cart is empty".to_string());
            return Err(DomainError::EmptyCart);
        }
        if let Err(e) = form.validate() {
            self.notifier.error(e.to_string());
            return Err(e);
        }

        let draft = Self::draft(cart, form);
        match self.orders.create(&draft).await {
            Ok(created) => {
                info!(
                    order_id = created.as_ref().map(|o| o.id.as_str()).unwrap_or("-"),
                    "order submitted"
                );
                cart.clear();
                form.reset();
                self.notifier
                    .success("Order placed! We will call you to confirm.".to_string());
                Ok(created)
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "order submission failed");
                self.notifier
                    .error("Could not place the order, please try again".to_string());
                Err(DomainError::from_infra(e))
            }
        }
    }
}
