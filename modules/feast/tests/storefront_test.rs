//! Catalog, cart checkout and table reservations against the in-memory backend.

mod common;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use common::RecordingNotifier;
use feast::contract::model::{
    Category, Language, LocalizedText, Order, OrderStatus, PaymentMethod, Reservation,
};
use feast::domain::cart::CartStore;
use feast::domain::checkout::{ContactForm, OrderSubmission};
use feast::domain::ports::CollectionPort;
use feast::domain::reservation::{ReservationForm, ReservationSubmission};
use feast::infra::InMemoryBackend;
use feast::{DomainError, Feast, FeastConfig};

fn contact() -> ContactForm {
    ContactForm {
        customer_name: "Nadia Benali".into(),
        customer_phone: "0550 11 22 33".into(),
        customer_address: "5 Boulevard Zighout Youcef, Alger".into(),
        customer_email: "nadia@mail.dz".into(),
        special_instructions: "Ring twice".into(),
    }
}

fn setup() -> (Arc<InMemoryBackend>, Arc<RecordingNotifier>, Feast) {
    let backend = Arc::new(InMemoryBackend::demo().unwrap());
    let notifier = RecordingNotifier::new();
    let feast = Feast::new(backend.clone(), notifier.clone(), FeastConfig::default());
    (backend, notifier, feast)
}

#[tokio::test]
async fn menu_sections_follow_display_order_and_skip_empty_categories() {
    let (backend, _, feast) = setup();
    backend
        .seed([Category {
            id: "drinks".into(),
            name: LocalizedText::uniform("Drinks"),
            display_order: 0,
        }])
        .unwrap();

    let catalog = feast.load_catalog().await.unwrap();
    let sections = catalog.sections(Language::En);

    let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
    assert_eq!(titles, ["Starters", "Main dishes", "Desserts"]);
    let mains: Vec<&str> = sections[1].dishes.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(mains, ["couscous", "chakhchoukha", "rechta"]);
    assert_eq!(catalog.categories().first().unwrap().id, "drinks");
}

#[tokio::test]
async fn dishes_can_be_picked_by_localized_name() {
    let (_, _, feast) = setup();
    let catalog = feast.load_catalog().await.unwrap();
    let mut cart = CartStore::new();

    let item = catalog
        .add_to_cart(&mut cart, "كسكس", 2, Language::Ar)
        .unwrap();

    assert_eq!(item.id, "couscous");
    assert_eq!(item.name, "كسكس");
    assert_eq!(cart.total(), Decimal::new(2400, 2));
}

#[tokio::test]
async fn unavailable_dish_cannot_be_added() {
    let (_, _, feast) = setup();
    let catalog = feast.load_catalog().await.unwrap();
    let mut cart = CartStore::new();

    let err = catalog
        .add_to_cart(&mut cart, "makrout", 1, Language::En)
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::DishUnavailable {
            name: "Makrout".into()
        }
    );
    assert!(cart.is_empty());
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_backend_call() {
    let (backend, notifier, feast) = setup();
    let mut cart = CartStore::new();
    let mut form = contact();

    let err = feast.checkout().submit(&mut cart, &mut form).await.unwrap_err();

    assert_eq!(err, DomainError::EmptyCart);
    assert_eq!(backend.calls(), 0);
    assert_eq!(notifier.errors(), ["Your cart is empty"]);
    assert_eq!(form, contact());
}

#[tokio::test]
async fn missing_address_is_rejected_before_any_backend_call() {
    let (backend, _, feast) = setup();
    let catalog = feast.load_catalog().await.unwrap();
    let calls_after_load = backend.calls();
    let mut cart = CartStore::new();
    catalog.add_to_cart(&mut cart, "chorba", 1, Language::En).unwrap();
    let mut form = ContactForm {
        customer_address: "   ".into(),
        ..contact()
    };

    let err = feast.checkout().submit(&mut cart, &mut form).await.unwrap_err();

    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "customer_address"));
    assert_eq!(backend.calls(), calls_after_load);
    assert_eq!(cart.item_count(), 1);
}

#[tokio::test]
async fn successful_checkout_snapshots_cart_and_resets_state() {
    let (backend, notifier, feast) = setup();
    let catalog = feast.load_catalog().await.unwrap();
    let mut cart = CartStore::new();
    catalog.add_to_cart(&mut cart, "chorba", 2, Language::En).unwrap();
    catalog.add_to_cart(&mut cart, "baklawa", 1, Language::En).unwrap();
    let mut form = contact();

    let created = feast
        .checkout()
        .submit(&mut cart, &mut form)
        .await
        .unwrap()
        .unwrap();

    assert!(cart.is_empty());
    assert_eq!(form, ContactForm::default());
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.payment_method, PaymentMethod::CashOnDelivery);
    assert_eq!(created.total_amount, Decimal::new(1300, 2));
    assert_eq!(created.order_items.len(), 2);
    assert_eq!(created.customer_email.as_deref(), Some("nadia@mail.dz"));
    assert_eq!(notifier.successes().len(), 1);

    let stored: Vec<Order> = backend.list().await.unwrap();
    assert_eq!(stored, vec![created]);
}

#[tokio::test]
async fn resubmitting_a_checked_out_cart_is_rejected() {
    let (backend, _, feast) = setup();
    let catalog = feast.load_catalog().await.unwrap();
    let checkout = feast.checkout();
    let mut cart = CartStore::new();
    catalog.add_to_cart(&mut cart, "rechta", 1, Language::En).unwrap();

    checkout.submit(&mut cart, &mut contact()).await.unwrap();
    let second = checkout.submit(&mut cart, &mut contact()).await;

    assert_eq!(second.unwrap_err(), DomainError::EmptyCart);
    let stored: Vec<Order> = backend.list().await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn failed_checkout_keeps_cart_and_form() {
    let (backend, notifier, feast) = setup();
    let catalog = feast.load_catalog().await.unwrap();
    let mut cart = CartStore::new();
    catalog.add_to_cart(&mut cart, "bourek", 3, Language::En).unwrap();
    let before = cart.clone();
    let mut form = contact();
    backend.set_offline(true);

    let err = OrderSubmission::new(backend.clone(), notifier.clone())
        .submit(&mut cart, &mut form)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Backend { ref message } if message.contains("backend offline")));
    assert_eq!(cart, before);
    assert_eq!(form, contact());
    assert_eq!(
        notifier.errors(),
        ["Could not place the order, please try again"]
    );
}

#[tokio::test]
async fn reservation_is_stored_and_form_reset() {
    let backend = Arc::new(InMemoryBackend::new());
    let notifier = RecordingNotifier::new();
    let submission = ReservationSubmission::new(backend.clone(), notifier.clone());
    let today = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
    let mut form = ReservationForm {
        customer_name: "Riad".into(),
        customer_phone: "0770 00 11 22".into(),
        date: Some(today),
        time: NaiveTime::from_hms_opt(21, 30, 0),
        guests: 6,
        special_requests: "Terrace please".into(),
        ..Default::default()
    };

    submission.submit(&mut form, today).await.unwrap();

    assert_eq!(form, ReservationForm::default());
    let stored: Vec<Reservation> = backend.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].number_of_guests, 6);
    assert_eq!(
        notifier.successes(),
        ["Table for 6 booked on 2025-07-10 at 21:30"]
    );
}

#[tokio::test]
async fn reservation_in_the_past_is_not_sent() {
    let backend = Arc::new(InMemoryBackend::new());
    let notifier = RecordingNotifier::new();
    let submission = ReservationSubmission::new(backend.clone(), notifier.clone());
    let mut form = ReservationForm {
        customer_name: "Riad".into(),
        customer_phone: "0770 00 11 22".into(),
        date: NaiveDate::from_ymd_opt(2025, 7, 9),
        time: NaiveTime::from_hms_opt(12, 0, 0),
        ..Default::default()
    };

    let res = submission
        .submit(&mut form, NaiveDate::from_ymd_opt(2025, 7, 10).unwrap())
        .await;

    assert!(res.is_err());
    assert_eq!(backend.calls(), 0);
    assert_eq!(form.customer_name, "Riad");
}
