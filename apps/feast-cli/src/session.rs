//! One interactive session: the cart, the forms and the admin panels live here
//! for as long as the shell runs.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use tracing::{debug, info};

use feast::contract::model::{DishDraft, Language, LocalizedText};
use feast::domain::cart::CartStore;
use feast::domain::catalog::Catalog;
use feast::domain::checkout::ContactForm;
use feast::domain::gate::AdminGate;
use feast::domain::panels::{DishesPanel, OrdersPanel, UsersPanel};
use feast::domain::reservation::ReservationForm;
use feast::{DomainError, Feast};

use crate::commands::{ShellCommand, HELP};
use crate::console::{self, ask, confirm_on_stdin};
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    feast: Feast,
    lang: Language,
    catalog: Catalog,
    cart: CartStore,
    contact: ContactForm,
    booking: ReservationForm,
    gate: AdminGate,
    dishes: DishesPanel,
    orders: OrdersPanel,
    users: UsersPanel,
}

impl Session {
    pub fn new(feast: Feast) -> Self {
        Self {
            lang: feast.config().language,
            catalog: Catalog::default(),
            cart: CartStore::new(),
            contact: ContactForm::default(),
            booking: ReservationForm::default(),
            gate: feast.admin_gate(),
            dishes: feast.dishes_panel(),
            orders: feast.orders_panel(),
            users: feast.users_panel(),
            feast,
        }
    }

    /// Fetch the menu once at start, like a page load.
    pub async fn start(&mut self) {
        if let Ok(catalog) = self.feast.load_catalog().await {
            self.catalog = catalog;
            print!("{}", render::menu(&self.catalog, self.lang));
        }
        println!("Type `help` for commands.");
    }

    pub fn prompt(&self) -> String {
        match self.cart.item_count() {
            0 => "feast> ".to_string(),
            n => format!("feast ({n})> "),
        }
    }

    /// Run one command. Errors are reported by the caller; the session stays usable.
    pub async fn execute(&mut self, cmd: ShellCommand) -> Result<Flow> {
        debug!(?cmd, "shell command");
        match cmd {
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Lang(lang) => {
                self.lang = lang;
                println!("Language set to {lang}");
            }
            ShellCommand::Menu => {
                self.catalog = self.feast.load_catalog().await?;
                print!("{}", render::menu(&self.catalog, self.lang));
            }
            ShellCommand::Add { dish, quantity } => {
                let item = self
                    .catalog
                    .add_to_cart(&mut self.cart, &dish, quantity, self.lang)?;
                println!(
                    "Added {} × {} ({} in cart)",
                    item.quantity,
                    item.name,
                    self.cart.item_count()
                );
            }
            ShellCommand::Remove(id) => {
                self.cart.remove(&id);
                print!("{}", render::cart(&self.cart));
            }
            ShellCommand::Quantity { id, quantity } => {
                self.cart.update_quantity(&id, quantity);
                print!("{}", render::cart(&self.cart));
            }
            ShellCommand::Inc(id) => {
                self.cart.increment(&id);
                print!("{}", render::cart(&self.cart));
            }
            ShellCommand::Dec(id) => {
                self.cart.decrement(&id);
                print!("{}", render::cart(&self.cart));
            }
            ShellCommand::Cart => print!("{}", render::cart(&self.cart)),
            ShellCommand::ClearCart => {
                self.cart.clear();
                println!("Cart cleared");
            }
            ShellCommand::Checkout => self.checkout().await?,
            ShellCommand::Reserve => self.reserve().await?,
            ShellCommand::Login(password) => self.login(password)?,
            ShellCommand::Logout => {
                self.gate.logout();
                println!("Logged out");
            }
            ShellCommand::Dashboard => {
                self.gate.require_unlocked()?;
                let dashboard = self.feast.dashboard().await?;
                print!("{}", render::dashboard(&dashboard));
            }
            admin => self.admin(admin).await?,
        }
        Ok(Flow::Continue)
    }

    async fn checkout(&mut self) -> Result<()> {
        if self.cart.is_empty() {
            // Let checkout report the empty cart without asking for contact details.
            self.feast
                .checkout()
                .submit(&mut self.cart, &mut self.contact)
                .await?;
            return Ok(());
        }
        print!("{}", render::cart(&self.cart));
        let form = &mut self.contact;
        form.customer_name = ask("Name", &form.customer_name)?;
        form.customer_phone = ask("Phone", &form.customer_phone)?;
        form.customer_address = ask("Delivery address", &form.customer_address)?;
        form.customer_email = ask("Email (optional)", &form.customer_email)?;
        form.special_instructions = ask("Instructions (optional)", &form.special_instructions)?;

        if let Some(order) = self
            .feast
            .checkout()
            .submit(&mut self.cart, &mut self.contact)
            .await?
        {
            println!("Order reference: {}", order.id);
        }
        Ok(())
    }

    async fn reserve(&mut self) -> Result<()> {
        let form = &mut self.booking;
        form.customer_name = ask("Name", &form.customer_name)?;
        form.customer_phone = ask("Phone", &form.customer_phone)?;
        form.customer_email = ask("Email (optional)", &form.customer_email)?;

        let current = form.date.map(|d| d.to_string()).unwrap_or_default();
        let raw = ask("Date (YYYY-MM-DD)", &current)?;
        form.date = Some(
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .with_context(|| format!("'{raw}' is not a date"))?,
        );
        let current = form.time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default();
        let raw = ask("Time (HH:MM)", &current)?;
        form.time = Some(
            NaiveTime::parse_from_str(&raw, "%H:%M")
                .with_context(|| format!("'{raw}' is not a time"))?,
        );
        let raw = ask("Guests", &form.guests.to_string())?;
        form.guests = raw
            .parse()
            .with_context(|| format!("'{raw}' is not a number of guests"))?;
        form.special_requests = ask("Special requests (optional)", &form.special_requests)?;

        let today = self.feast.today();
        self.feast
            .reservations()
            .submit(&mut self.booking, today)
            .await?;
        Ok(())
    }

    fn login(&mut self, password: Option<String>) -> Result<()> {
        let password = match password {
            Some(p) => p,
            None => console::read_line("Admin password: ")?.unwrap_or_default(),
        };
        if console::report_gate(self.gate.submit(&password)) {
            info!("admin session started");
        }
        Ok(())
    }

    async fn admin(&mut self, cmd: ShellCommand) -> Result<()> {
        self.gate.require_unlocked()?;
        let lang = self.lang;
        match cmd {
            ShellCommand::Dishes { search } => {
                self.dishes.load().await?;
                self.dishes.set_search(search);
                print!("{}", render::dishes(&self.dishes.filtered(), lang));
            }
            ShellCommand::DishAdd => {
                let draft = dish_form(None)?;
                self.dishes.save(None, draft).await?;
            }
            ShellCommand::DishEdit(id) => {
                self.ensure_dishes().await?;
                let current = self
                    .dishes
                    .find(&id)
                    .map(|d| d.to_draft())
                    .ok_or_else(|| DomainError::not_found("Dish", id.as_str()))?;
                let draft = dish_form(Some(current))?;
                self.dishes.save(Some(id.as_str()), draft).await?;
            }
            ShellCommand::DishToggle(id) => {
                self.ensure_dishes().await?;
                let available = self.dishes.toggle_availability(&id).await?;
                println!(
                    "{id} is now {}",
                    if available { "available" } else { "unavailable" }
                );
            }
            ShellCommand::DishDelete(id) => {
                self.dishes.delete(&id, &confirm_on_stdin).await?;
            }
            ShellCommand::Orders { search } => {
                self.orders.load().await?;
                self.orders.set_search(search);
                self.print_orders();
            }
            ShellCommand::OrdersFilter(status) => {
                self.orders.set_status_filter(status);
                self.print_orders();
            }
            ShellCommand::SetOrderStatus { id, status } => {
                if self.orders.panel().find(&id).is_none() {
                    self.orders.load().await?;
                }
                self.orders.set_status(&id, status).await?;
            }
            ShellCommand::OrderDelete(id) => {
                self.orders.panel_mut().delete(&id, &confirm_on_stdin).await?;
            }
            ShellCommand::Users { search } => {
                self.users.load().await?;
                self.users.set_search(search);
                print!(
                    "{}",
                    render::users(&self.users.filtered(), &self.users.stats())
                );
            }
            ShellCommand::SetUserStatus { id, status } => {
                if self.users.find(&id).is_none() {
                    self.users.load().await?;
                }
                self.users.set_status(&id, status).await?;
            }
            ShellCommand::UserDelete(id) => {
                self.users.delete(&id, &confirm_on_stdin).await?;
            }
            other => debug!(?other, "not an admin command"),
        }
        Ok(())
    }

    async fn ensure_dishes(&mut self) -> Result<()> {
        if self.dishes.items().is_empty() {
            self.dishes.load().await?;
        }
        Ok(())
    }

    fn print_orders(&self) {
        if let Some(status) = self.orders.status_filter() {
            println!("Showing {status} orders (`filter all` to reset)");
        }
        print!("{}", render::status_counts(&self.orders.status_counts()));
        print!("{}", render::orders(&self.orders.visible()));
    }
}

/// Whether the notifier already told the user about this failure.
pub fn is_reported(err: &DomainError) -> bool {
    matches!(
        err,
        DomainError::Validation { .. }
            | DomainError::EmptyCart
            | DomainError::IllegalTransition { .. }
            | DomainError::Backend { .. }
    )
}

/// Prompt for every dish field, starting from `current` when editing.
fn dish_form(current: Option<DishDraft>) -> Result<DishDraft> {
    let mut draft = current.unwrap_or_else(|| DishDraft {
        category_id: None,
        name: LocalizedText::default(),
        description: LocalizedText::default(),
        price: Decimal::ZERO,
        image_url: None,
        is_available: true,
        display_order: 0,
    });

    draft.name.en = ask("Name (en)", &draft.name.en)?;
    draft.name.ar = ask("Name (ar)", &draft.name.ar)?;
    draft.name.fr = ask("Name (fr)", &draft.name.fr)?;
    draft.description.en = ask("Description (en)", &draft.description.en)?;
    draft.description.ar = ask("Description (ar)", &draft.description.ar)?;
    draft.description.fr = ask("Description (fr)", &draft.description.fr)?;

    let price = ask("Price", &draft.price.to_string())?;
    draft.price = price
        .parse()
        .with_context(|| format!("'{price}' is not a price"))?;
    let category = ask("Category id", draft.category_id.as_deref().unwrap_or(""))?;
    draft.category_id = (!category.is_empty()).then_some(category);
    let image = ask("Image URL (optional)", draft.image_url.as_deref().unwrap_or(""))?;
    draft.image_url = (!image.is_empty()).then_some(image);
    let order = ask("Display order", &draft.display_order.to_string())?;
    draft.display_order = order
        .parse()
        .with_context(|| format!("'{order}' is not a number"))?;
    Ok(draft)
}
