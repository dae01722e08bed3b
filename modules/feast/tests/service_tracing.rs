//! The domain and backend layers emit the expected spans and events.

mod common;

use std::sync::Arc;

use tracing_test::traced_test;

use common::RecordingNotifier;
use feast::contract::model::{Language, OrderStatus};
use feast::domain::cart::CartStore;
use feast::domain::checkout::ContactForm;
use feast::domain::gate::GateOutcome;
use feast::infra::InMemoryBackend;
use feast::{Feast, FeastConfig};

fn feast() -> Feast {
    Feast::new(
        Arc::new(InMemoryBackend::demo().unwrap()),
        RecordingNotifier::new(),
        FeastConfig::default(),
    )
}

#[traced_test]
#[tokio::test]
async fn checkout_logs_submission() {
    let feast = feast();
    let catalog = feast.load_catalog().await.unwrap();
    let mut cart = CartStore::new();
    catalog.add_to_cart(&mut cart, "rechta", 1, Language::En).unwrap();
    let mut form = ContactForm {
        customer_name: "Sofiane".into(),
        customer_phone: "0550 55 55 55".into(),
        customer_address: "Béjaïa".into(),
        ..Default::default()
    };

    feast.checkout().submit(&mut cart, &mut form).await.unwrap();

    assert!(logs_contain("catalog loaded"));
    assert!(logs_contain("feast.checkout.submit"));
    assert!(logs_contain("order submitted"));
}

#[traced_test]
#[tokio::test]
async fn status_change_is_traced() {
    let feast = feast();
    let mut cart = CartStore::new();
    let catalog = feast.load_catalog().await.unwrap();
    catalog.add_to_cart(&mut cart, "chorba", 1, Language::En).unwrap();
    let order = feast
        .checkout()
        .submit(
            &mut cart,
            &mut ContactForm {
                customer_name: "Sofiane".into(),
                customer_phone: "0550 55 55 55".into(),
                customer_address: "Béjaïa".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    let mut panel = feast.orders_panel();
    panel.load().await.unwrap();
    panel.set_status(&order.id, OrderStatus::Confirmed).await.unwrap();

    assert!(logs_contain("feast.orders.set_status"));
    assert!(logs_contain("order status changed"));
}

#[traced_test]
#[test]
fn wrong_password_is_logged() {
    let mut gate = feast().admin_gate();
    assert_eq!(gate.submit("nope"), GateOutcome::Rejected { remaining: 4 });
    assert!(logs_contain("wrong admin password"));
}
