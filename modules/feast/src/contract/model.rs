use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Languages the storefront is published in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
    Fr,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ar, Language::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
            Language::Fr => "fr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported language '{s}' (expected en, ar or fr)"))
    }
}

/// Text published in every supported language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub ar: String,
    #[serde(default)]
    pub fr: String,
}

impl LocalizedText {
    /// Same text for every language.
    pub fn uniform(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            en: text.clone(),
            ar: text.clone(),
            fr: text,
        }
    }

    /// Text in `lang`, falling back to English when that translation is blank.
    pub fn get(&self, lang: Language) -> &str {
        let text = match lang {
            Language::En => &self.en,
            Language::Ar => &self.ar,
            Language::Fr => &self.fr,
        };
        if text.trim().is_empty() {
            &self.en
        } else {
            text
        }
    }

    pub fn is_blank(&self) -> bool {
        self.en.trim().is_empty() && self.ar.trim().is_empty() && self.fr.trim().is_empty()
    }

    /// Case-insensitive substring match against any translation. `needle` must be lowercase.
    pub(crate) fn contains_lowercase(&self, needle: &str) -> bool {
        [&self.en, &self.ar, &self.fr]
            .iter()
            .any(|t| t.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: LocalizedText,
    #[serde(default)]
    pub display_order: i32,
}

fn available_by_default() -> bool {
    true
}

/// A menu item as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Full dish record without server-assigned fields; sent on create and on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishDraft {
    pub category_id: Option<String>,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub display_order: i32,
}

impl Dish {
    pub fn to_draft(&self) -> DishDraft {
        DishDraft {
            category_id: self.category_id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            is_available: self.is_available,
            display_order: self.display_order,
        }
    }
}

/// One line of the cart, and of an order's item snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity: 1,
            image_url: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown order status '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
}

/// A submitted delivery order. `order_items` is a snapshot taken at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub order_items: Vec<CartItem>,
    #[serde(alias = "total_price")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_email: Option<String>,
    pub special_instructions: String,
    pub order_items: Vec<CartItem>,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
}

/// Partial order update: only the status field is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPatch {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    Blocked,
}

impl UserStatus {
    pub const ALL: [UserStatus; 3] = [UserStatus::Active, UserStatus::Inactive, UserStatus::Blocked];

    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown user status '{s}'"))
    }
}

/// Customer record managed from the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub join_date: NaiveDate,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub total_spent: Decimal,
    pub status: UserStatus,
    #[serde(default)]
    pub last_order: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub status: UserStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub number_of_guests: u8,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub number_of_guests: u8,
    pub special_requests: String,
}
