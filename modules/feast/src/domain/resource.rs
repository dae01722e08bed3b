use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::contract::model::{
    Category, Dish, DishDraft, NewCategory, NewOrder, NewReservation, NewUser, Order, OrderPatch,
    Reservation, User, UserPatch,
};

/// A record type stored in one backend collection.
///
/// `Draft` is the body of a create call and `Patch` the body of an update call.
/// `from_draft`/`apply_patch` describe what the backend does with them; only
/// backends that keep the data themselves need those.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Draft: Serialize + Clone + Send + Sync + 'static;
    type Patch: Serialize + Clone + Send + Sync + 'static;

    /// Collection name, also the last path segment of the REST endpoint.
    const COLLECTION: &'static str;
    /// Human-readable singular, used in messages.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn from_draft(id: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch);

    /// Presentation order applied after every fetch.
    fn arrange(_items: &mut [Self]) {}
}

impl Resource for Category {
    type Draft = NewCategory;
    type Patch = NewCategory;

    const COLLECTION: &'static str = "categories";
    const KIND: &'static str = "Category";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewCategory, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            display_order: draft.display_order,
        }
    }

    fn apply_patch(&mut self, patch: NewCategory) {
        self.name = patch.name;
        self.display_order = patch.display_order;
    }

    fn arrange(items: &mut [Self]) {
        items.sort_by_key(|c| c.display_order);
    }
}

impl Resource for Dish {
    type Draft = DishDraft;
    type Patch = DishDraft;

    const COLLECTION: &'static str = "dishes";
    const KIND: &'static str = "Dish";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: DishDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            category_id: draft.category_id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            image_url: draft.image_url,
            is_available: draft.is_available,
            display_order: draft.display_order,
            created_at: Some(now),
        }
    }

    fn apply_patch(&mut self, patch: DishDraft) {
        self.category_id = patch.category_id;
        self.name = patch.name;
        self.description = patch.description;
        self.price = patch.price;
        self.image_url = patch.image_url;
        self.is_available = patch.is_available;
        self.display_order = patch.display_order;
    }

    fn arrange(items: &mut [Self]) {
        items.sort_by_key(|d| d.display_order);
    }
}

impl Resource for Order {
    type Draft = NewOrder;
    type Patch = OrderPatch;

    const COLLECTION: &'static str = "orders";
    const KIND: &'static str = "Order";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            customer_address: draft.customer_address,
            customer_email: draft.customer_email,
            special_instructions: draft.special_instructions,
            order_items: draft.order_items,
            total_amount: draft.total_amount,
            payment_method: draft.payment_method,
            status: draft.status,
            created_at: now,
        }
    }

    fn apply_patch(&mut self, patch: OrderPatch) {
        self.status = patch.status;
    }

    /// Newest first.
    fn arrange(items: &mut [Self]) {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
}

impl Resource for User {
    type Draft = NewUser;
    type Patch = UserPatch;

    const COLLECTION: &'static str = "users";
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            address: draft.address,
            join_date: now.date_naive(),
            total_orders: 0,
            total_spent: Default::default(),
            status: draft.status,
            last_order: None,
        }
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        self.status = patch.status;
    }
}

impl Resource for Reservation {
    type Draft = NewReservation;
    type Patch = NewReservation;

    const COLLECTION: &'static str = "reservations";
    const KIND: &'static str = "Reservation";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewReservation, now: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            customer_email: draft.customer_email,
            reservation_date: draft.reservation_date,
            reservation_time: draft.reservation_time,
            number_of_guests: draft.number_of_guests,
            special_requests: draft.special_requests,
            created_at: Some(now),
        }
    }

    fn apply_patch(&mut self, patch: NewReservation) {
        let created_at = self.created_at;
        *self = Self::from_draft(std::mem::take(&mut self.id), patch, Utc::now());
        self.created_at = created_at;
    }

    fn arrange(items: &mut [Self]) {
        items.sort_by_key(|r| (r.reservation_date, r.reservation_time));
    }
}
