//! Delivery invariants and invoice payment derivation.

mod support;

use rust_decimal_macros::dec;
use uuid::Uuid;

use common::AppError;
use domain::{
    Actor, DeliveryStatus, InvoiceInput, InvoiceItemInput, NotificationType, UserRole,
};
use logistics_service_lib::service::ServiceContainer;

use support::{delivery_input, setup, today};

fn invoice_input(owner: Option<Uuid>, paid: bool, status: Option<&str>) -> InvoiceInput {
    InvoiceInput {
        user_id: owner,
        invoice_status: status.map(str::to_string),
        invoice_type: "Shipping".into(),
        quantity: Some(2),
        invoice_datetime: None,
        cost: dec!(24.60),
        paid,
        payment_method: "Card".into(),
        name: "Maria Silva".into(),
        address: "Rua C 3".into(),
        contact: "912345678".into(),
        items: vec![
            InvoiceItemInput {
                shipment_type: "Parcel".into(),
                weight: dec!(1.5),
                delivery_speed: "Express".into(),
                quantity: 2,
                unit_price: dec!(10.00),
                notes: None,
            },
            InvoiceItemInput {
                shipment_type: "Letter".into(),
                weight: dec!(0.1),
                delivery_speed: "Normal".into(),
                quantity: 1,
                unit_price: dec!(0.50),
                notes: Some("Registered".into()),
            },
        ],
    }
}

#[tokio::test]
async fn completed_delivery_requires_a_date() {
    let (app, _) = setup().await;
    let admin = app.admin().await;

    let mut input = delivery_input("TRK-100", None);
    input.status = DeliveryStatus::Completed;
    let result = app
        .services
        .deliveries()
        .upsert_delivery(&admin, input.clone(), None)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    input.delivery_date = Some(today());
    let delivery = app
        .services
        .deliveries()
        .upsert_delivery(&admin, input, None)
        .await
        .unwrap();
    assert_eq!(delivery.status, DeliveryStatus::Completed);
}

#[tokio::test]
async fn weight_must_be_positive() {
    let (app, _) = setup().await;
    let admin = app.admin().await;

    let mut input = delivery_input("TRK-101", None);
    input.weight = dec!(0);
    let result = app.services.deliveries().upsert_delivery(&admin, input, None).await;

    assert!(result.unwrap_err().is_validation());
    assert!(app
        .services
        .deliveries()
        .track_delivery("TRK-101")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn update_keeps_registration_and_stamps_updated_at() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let deliveries = app.services.deliveries();

    let created = deliveries
        .upsert_delivery(&admin, delivery_input("TRK-102", None), None)
        .await
        .unwrap();
    assert_eq!(created.updated_at, None);

    let mut change = delivery_input("TRK-102", None);
    change.status = DeliveryStatus::InTransit;
    change.in_transition = true;
    let updated = deliveries
        .upsert_delivery(&admin, change, Some(created.id))
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.registered_at, created.registered_at);
    assert!(updated.updated_at.unwrap() > updated.registered_at);
    assert_eq!(updated.status, DeliveryStatus::InTransit);
}

#[tokio::test]
async fn tracking_numbers_are_unique() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let deliveries = app.services.deliveries();

    deliveries
        .upsert_delivery(&admin, delivery_input("TRK-103", None), None)
        .await
        .unwrap();
    let result = deliveries
        .upsert_delivery(&admin, delivery_input("TRK-103", None), None)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn clients_only_see_their_own_deliveries() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let ana = app.register("ana", UserRole::Client).await;
    let rui = app.register("rui", UserRole::Client).await;

    let mut mine = delivery_input("TRK-200", None);
    mine.client_id = Some(ana.id);
    let mine = app
        .services
        .deliveries()
        .upsert_delivery(&admin, mine, None)
        .await
        .unwrap();
    let mut theirs = delivery_input("TRK-201", None);
    theirs.client_id = Some(rui.id);
    let theirs = app
        .services
        .deliveries()
        .upsert_delivery(&admin, theirs, None)
        .await
        .unwrap();

    let as_ana = Actor::new(ana.id, ana.role, ana.email.clone());
    let visible = app.services.deliveries().list_deliveries(&as_ana).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, mine.id);
    assert!(matches!(
        app.services.deliveries().get_delivery(&as_ana, theirs.id).await,
        Err(AppError::Forbidden)
    ));
    assert_eq!(
        app.services.deliveries().list_deliveries(&admin).await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn paid_invoices_are_always_marked_paid() {
    let (app, store) = setup().await;
    let admin = app.admin().await;
    let owner = app.register("cliente", UserRole::Client).await;
    let invoices = app.services.invoices();

    let pending = invoices
        .upsert_invoice(&admin, invoice_input(Some(owner.id), false, None), None)
        .await
        .unwrap();
    assert_eq!(pending.invoice_status, "Pending");
    assert_eq!(pending.items.len(), 2);

    let totals = pending.totals();
    assert_eq!(totals.subtotal, dec!(20.50));
    assert_eq!(totals.tax, dec!(4.72));
    assert_eq!(totals.total, dec!(25.22));

    let paid = invoices
        .upsert_invoice(
            &admin,
            invoice_input(Some(owner.id), true, Some("Overdue")),
            Some(pending.id),
        )
        .await
        .unwrap();
    assert_eq!(paid.invoice_status, "Paid");
    assert_eq!(paid.id_invoice, pending.id_invoice);

    let next = invoices
        .upsert_invoice(&admin, invoice_input(None, false, Some("Draft")), None)
        .await
        .unwrap();
    assert_eq!(next.invoice_status, "Draft");
    assert_eq!(next.id_invoice, pending.id_invoice + 1);

    app.notifier.shutdown().await;
    let paid_for_owner = store
        .all()
        .await
        .into_iter()
        .filter(|n| {
            n.notification_type == NotificationType::InvoicePaid
                && n.recipient_contact == owner.email
        })
        .count();
    assert_eq!(paid_for_owner, 1);
}

#[tokio::test]
async fn unpaid_invoice_cannot_claim_paid_status() {
    let (app, _) = setup().await;
    let admin = app.admin().await;

    let result = app
        .services
        .invoices()
        .upsert_invoice(&admin, invoice_input(None, false, Some("Paid")), None)
        .await;

    assert!(result.unwrap_err().is_validation());
    assert!(app
        .services
        .invoices()
        .list_invoices(&admin)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn invoice_reads_follow_the_caller_role() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let owner = app.register("dono", UserRole::Client).await;
    let stranger = app.register("outro", UserRole::Client).await;

    let invoice = app
        .services
        .invoices()
        .upsert_invoice(&admin, invoice_input(Some(owner.id), false, None), None)
        .await
        .unwrap();

    let as_owner = Actor::new(owner.id, owner.role, owner.email.clone());
    assert_eq!(
        app.services.invoices().list_invoices(&as_owner).await.unwrap().len(),
        1
    );

    let as_stranger = Actor::new(stranger.id, stranger.role, stranger.email.clone());
    assert!(app
        .services
        .invoices()
        .list_invoices(&as_stranger)
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        app.services.invoices().get_invoice(&as_stranger, invoice.id).await,
        Err(AppError::Forbidden)
    ));

    let driver = app.driver(&admin, "motorista").await;
    let as_driver = app.actor(driver.user_id).await;
    assert!(matches!(
        app.services.invoices().list_invoices(&as_driver).await,
        Err(AppError::Forbidden)
    ));
}

#[tokio::test]
async fn invoice_delete_is_protected_by_deliveries() {
    let (app, _) = setup().await;
    let admin = app.admin().await;

    let invoice = app
        .services
        .invoices()
        .upsert_invoice(&admin, invoice_input(None, true, None), None)
        .await
        .unwrap();
    let mut input = delivery_input("TRK-300", None);
    input.invoice_id = Some(invoice.id);
    let delivery = app
        .services
        .deliveries()
        .upsert_delivery(&admin, input, None)
        .await
        .unwrap();

    let result = app.services.invoices().delete_invoice(&admin, invoice.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    app.services
        .deliveries()
        .delete_delivery(&admin, delivery.id)
        .await
        .unwrap();
    app.services
        .invoices()
        .delete_invoice(&admin, invoice.id)
        .await
        .unwrap();
    assert!(app
        .services
        .invoices()
        .get_invoice(&admin, invoice.id)
        .await
        .unwrap_err()
        .is_not_found());
}
