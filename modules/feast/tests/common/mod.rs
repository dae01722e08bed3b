#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;

use feast::contract::model::{CartItem, Order, OrderStatus, PaymentMethod, User, UserStatus};
use feast::domain::ports::{Notice, NoticeLevel, Notifier};

/// Notifier that keeps every notice for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.with_level(NoticeLevel::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.with_level(NoticeLevel::Success)
    }

    fn with_level(&self, level: NoticeLevel) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

pub fn at(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
}

pub fn order(id: &str, name: &str, status: OrderStatus, total_cents: i64, created: &str) -> Order {
    Order {
        id: id.to_string(),
        customer_name: name.to_string(),
        customer_phone: "0555 10 20 30".to_string(),
        customer_address: "12 Rue Larbi Ben M'hidi, Oran".to_string(),
        customer_email: None,
        special_instructions: String::new(),
        order_items: vec![
            CartItem::new("couscous", "Couscous", Decimal::new(total_cents, 2)),
        ],
        total_amount: Decimal::new(total_cents, 2),
        payment_method: PaymentMethod::CashOnDelivery,
        status,
        created_at: at(created),
    }
}

pub fn user(id: &str, name: &str, status: UserStatus) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@mail.dz", name.to_lowercase()),
        phone: "0661 00 00 00".to_string(),
        address: "Constantine".to_string(),
        join_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        total_orders: 2,
        total_spent: Decimal::new(2400, 2),
        status,
        last_order: None,
    }
}
