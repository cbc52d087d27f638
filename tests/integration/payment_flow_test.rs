//! Payment flows
//!
//! Batch payment, quick payment, bulk payment, single confirmations, receipt
//! corrections and delivery confirmation against the in-memory order store.

#[path = "../helpers/mod.rs"]
mod helpers;

use compras::approvals::ApproveOrderRequest;
use compras::core::{AppError, Currency, OrderId};
use compras::modules::orders::models::{OrderStatus, ReceiptFields};
use compras::payments::{
    ConfirmPaymentRequest, PayBatchRequest, PayBulkRequest, PaymentProof, QuickPayItem,
    QuickPayRequest, UpdateReceiptRequest,
};
use helpers::*;
use rust_decimal_macros::dec;

/// Approve `ids` at `price` each into one batch and return the batch id
async fn queue_for_payment(engines: &TestEngines, ids: &[OrderId], price: rust_decimal::Decimal) -> String {
    let prices: Vec<_> = ids.iter().map(|id| (*id, price)).collect();
    let request = TestDataFactory::batch_request(ids.to_vec(), &prices, Currency::PEN);
    engines
        .approvals
        .approve_batch(request, BUYER)
        .await
        .unwrap()
        .batch_id
}

fn pay_batch_request(batch_id: &str) -> PayBatchRequest {
    PayBatchRequest {
        batch_id: batch_id.to_string(),
        receipt: TestDataFactory::receipt(),
        proof: PaymentProof::file("payment_proofs/transfer-0310.pdf"),
    }
}

fn quick_pay_request() -> QuickPayRequest {
    QuickPayRequest {
        project_id: Some(PROJECT_ID),
        seller_name: "Ferreteria El Maestro".to_string(),
        seller_document: Some("10456789012".to_string()),
        payment_type: Default::default(),
        currency: Currency::PEN,
        issue_date: None,
        due_date: None,
        items: vec![
            QuickPayItem::new("Disco de corte 7\"", dec!(4), dec!(48)),
            QuickPayItem::new("Guantes de cuero", dec!(10), dec!(85)),
        ],
        receipt: ReceiptFields::default(),
        proof: PaymentProof::link("https://drive.example/f/boleta-88"),
    }
}

#[tokio::test]
async fn test_pay_unknown_batch_is_not_found() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Cemento", dec!(10)));
    queue_for_payment(&engines, &[id], dec!(280)).await;
    let before = engines.store.orders();

    let result = engines
        .payments
        .pay_batch(pay_batch_request("BATCH-X"), BUYER)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(engines.store.orders(), before);
}

#[tokio::test]
async fn test_pay_batch_confirms_queued_orders() {
    let engines = TestEngines::new();
    let a = engines.seed(TestDataFactory::material_order(1, "Ladrillo pandereta", dec!(1000)));
    let b = engines.seed(TestDataFactory::service_order(2, "Alquiler de mezcladora"));
    let batch_id = queue_for_payment(&engines, &[a, b], dec!(650)).await;
    let registered_on_approval = engines.inventory.registrations().len();

    let outcome = engines
        .payments
        .pay_batch(pay_batch_request(&batch_id), 9)
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.orders, 2);
    assert_eq!(outcome.batch_id.as_deref(), Some(batch_id.as_str()));

    for id in [a, b] {
        let order = engines.store.order(id);
        assert_eq!(order.status, OrderStatus::Approved);
        assert!(order.payment_confirmed);
        assert_eq!(order.payment_confirmed_by, Some(9));
        assert_eq!(order.cdp_serie.as_deref(), Some("F001"));
        assert_eq!(order.payment_proof.as_deref(), Some("payment_proofs/transfer-0310.pdf"));
        assert_eq!(order.payment_proof_link, None);
        assert!(!order.delivery_confirmed);
    }

    let registrations = engines.inventory.registrations();
    assert_eq!(registrations.len(), registered_on_approval + 1);
    let paid = registrations.last().unwrap();
    assert_eq!(paid.batch_id, batch_id);
    assert_eq!(paid.items[0].subtotal, dec!(650));
    assert_eq!(paid.items[0].amount_pen, dec!(650));

    let again = engines.payments.pay_batch(pay_batch_request(&batch_id), 9).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_pay_batch_leaves_stock_served_rows_alone() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Varilla 5/8\"", dec!(50)));

    let mut request = TestDataFactory::batch_request(vec![id], &[(id, dec!(900))], Currency::PEN);
    request
        .inventory_splits
        .insert(id, TestDataFactory::split(2, dec!(20), dec!(30), dec!(28)));
    let batch_id = engines
        .approvals
        .approve_batch(request, BUYER)
        .await
        .unwrap()
        .batch_id;
    let sibling_before = engines.store.children_of(id)[0].clone();
    let registered_on_approval = engines.inventory.registrations().len();

    let outcome = engines
        .payments
        .pay_batch(pay_batch_request(&batch_id), BUYER)
        .await
        .unwrap();

    assert_eq!(outcome.orders, 1);
    assert_eq!(engines.store.children_of(id)[0], sibling_before);
    assert_eq!(engines.inventory.registrations().len(), registered_on_approval + 1);
}

#[tokio::test]
async fn test_quick_pay_creates_paid_orders_with_next_item_numbers() {
    let engines = TestEngines::new();
    engines.seed(TestDataFactory::material_order(1, "Cemento", dec!(10)));
    engines.seed(TestDataFactory::material_order(2, "Arena", dec!(5)));

    let outcome = engines
        .payments
        .quick_pay(quick_pay_request(), BUYER)
        .await
        .unwrap();

    let batch_id = outcome.batch_id.clone().unwrap();
    assert!(batch_id.starts_with("QP-"));
    assert_eq!(outcome.orders, 2);

    let created: Vec<_> = engines
        .store
        .orders()
        .into_iter()
        .filter(|o| o.batch_id.as_deref() == Some(batch_id.as_str()))
        .collect();
    assert_eq!(created.len(), 2);
    assert_eq!(
        created.iter().map(|o| o.item_number).collect::<Vec<_>>(),
        vec![3, 4]
    );

    let disc = &created[0];
    assert_eq!(disc.status, OrderStatus::Approved);
    assert!(disc.payment_confirmed);
    assert!(disc.is_material());
    assert_eq!(disc.amount, Some(dec!(48)));
    assert_eq!(disc.amount_pen, Some(dec!(48)));
    assert_eq!(disc.total_with_igv, Some(dec!(48)));
    assert_eq!(disc.unit.as_deref(), Some("UND"));
    assert_eq!(disc.materials[0].qty, dec!(4));
    assert_eq!(disc.created_by, Some(BUYER));
    assert_eq!(disc.seller_document.as_deref(), Some("10456789012"));
    assert_eq!(disc.payment_proof_link.as_deref(), Some("https://drive.example/f/boleta-88"));
    assert!(disc.payment_date.is_some());

    let registrations = engines.inventory.registrations();
    assert_eq!(registrations.len(), 2);
    assert!(registrations.iter().all(|r| r.project_name == PROJECT_NAME));
    assert_eq!(registrations[1].items[0].description, "Guantes de cuero");
    assert_eq!(registrations[1].items[0].qty, dec!(10));
}

#[tokio::test]
async fn test_quick_pay_in_usd_converts_each_item() {
    let engines = TestEngines::new();
    let mut request = quick_pay_request();
    request.currency = Currency::USD;

    engines.payments.quick_pay(request, BUYER).await.unwrap();

    assert_eq!(engines.rates.calls(), 1);
    let orders = engines.store.orders();
    assert_eq!(orders[0].exchange_rate, Some(USD_RATE));
    assert_eq!(orders[0].amount, Some(dec!(48)));
    assert_eq!(orders[0].amount_pen, Some(dec!(180.00)));
    assert_eq!(engines.inventory.registrations()[0].items[0].amount_pen, dec!(180.00));
}

#[tokio::test]
async fn test_quick_pay_validation_happens_before_writes() {
    let engines = TestEngines::new();

    let mut no_proof = quick_pay_request();
    no_proof.proof = PaymentProof::default();
    let mut no_document = quick_pay_request();
    no_document.seller_document = None;
    let mut no_items = quick_pay_request();
    no_items.items.clear();
    let mut no_project = quick_pay_request();
    no_project.project_id = None;

    for request in [no_proof, no_document, no_items, no_project] {
        let result = engines.payments.quick_pay(request, BUYER).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    assert!(engines.store.orders().is_empty());
    assert_eq!(engines.store.commit_count(), 0);
    assert!(engines.inventory.registrations().is_empty());
}

#[tokio::test]
async fn test_pay_bulk_approves_and_pays_queued_orders() {
    let engines = TestEngines::new();
    let a = engines.seed(TestDataFactory::material_order(1, "Tee PVC", dec!(12)));
    let b = engines.seed(TestDataFactory::material_order(2, "Union PVC", dec!(12)));
    queue_for_payment(&engines, &[a, b], dec!(30)).await;
    let registered_before = engines.inventory.registrations().len();

    let outcome = engines
        .payments
        .pay_bulk(
            PayBulkRequest {
                order_ids: vec![a, b],
                prices: [(a, dec!(36)), (b, dec!(24))].into_iter().collect(),
                invoice: TestDataFactory::invoice(Currency::PEN),
            },
            BUYER,
        )
        .await
        .unwrap();

    let batch_id = outcome.batch_id.unwrap();
    assert!(batch_id.starts_with("PAY-"));
    assert_eq!(outcome.orders, 2);

    let order = engines.store.order(a);
    assert_eq!(order.status, OrderStatus::Approved);
    assert!(order.payment_confirmed);
    assert_eq!(order.amount, Some(dec!(36)));
    assert_eq!(order.batch_id.as_deref(), Some(batch_id.as_str()));
    assert_eq!(engines.inventory.registrations().len(), registered_before);
}

#[tokio::test]
async fn test_pay_bulk_requires_every_order_queued() {
    let engines = TestEngines::new();
    let queued = engines.seed(TestDataFactory::material_order(1, "Tee PVC", dec!(12)));
    let pending = engines.seed(TestDataFactory::material_order(2, "Codo PVC", dec!(12)));
    queue_for_payment(&engines, &[queued], dec!(30)).await;
    let before = engines.store.orders();

    let result = engines
        .payments
        .pay_bulk(
            PayBulkRequest {
                order_ids: vec![queued, pending],
                prices: [(queued, dec!(30)), (pending, dec!(20))].into_iter().collect(),
                invoice: TestDataFactory::invoice(Currency::PEN),
            },
            BUYER,
        )
        .await;

    assert!(matches!(result, Err(AppError::PreconditionFailed(_))));
    assert_eq!(engines.store.orders(), before);
}

#[tokio::test]
async fn test_pay_bulk_without_rate_never_opens_a_transaction() {
    let engines = TestEngines::with(StubRates::unavailable(), RecordingInventory::new());
    let mut order = TestDataFactory::material_order(1, "Tee PVC", dec!(12));
    order.status = OrderStatus::ToPay;
    let queued = engines.seed(order);

    let result = engines
        .payments
        .pay_bulk(
            PayBulkRequest {
                order_ids: vec![queued],
                prices: [(queued, dec!(30))].into_iter().collect(),
                invoice: TestDataFactory::invoice(Currency::USD),
            },
            BUYER,
        )
        .await;

    assert!(matches!(result, Err(AppError::ExternalRateUnavailable)));
    assert_eq!(engines.rates.calls(), 1);
    assert_eq!(engines.store.begin_count(), 0);
    assert_eq!(engines.store.order(queued).status, OrderStatus::ToPay);
}

#[tokio::test]
async fn test_quick_pay_rejects_oversized_item() {
    let engines = TestEngines::new();
    let mut request = quick_pay_request();
    request.currency = Currency::USD;
    request.items[0].subtotal = rust_decimal::Decimal::MAX;

    let result = engines.payments.quick_pay(request, BUYER).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(engines.store.orders().is_empty());
    assert_eq!(engines.store.begin_count(), 0);
    assert_eq!(engines.rates.calls(), 0);
}

#[tokio::test]
async fn test_confirm_payment_of_approved_order() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Calamina", dec!(40)));
    engines
        .approvals
        .approve(
            id,
            ApproveOrderRequest {
                amount: dec!(1240),
                invoice: TestDataFactory::invoice(Currency::PEN),
            },
            BUYER,
        )
        .await
        .unwrap();
    let batch_id = engines.store.order(id).batch_id.unwrap();

    let incomplete = ConfirmPaymentRequest {
        receipt: ReceiptFields {
            cdp_number: None,
            ..TestDataFactory::receipt()
        },
        proof: PaymentProof::file("payment_proofs/calamina.pdf"),
    };
    assert!(matches!(
        engines.payments.confirm_payment(id, incomplete, BUYER).await,
        Err(AppError::Validation(_))
    ));

    let request = ConfirmPaymentRequest {
        receipt: TestDataFactory::receipt(),
        proof: PaymentProof::file("payment_proofs/calamina.pdf"),
    };
    engines
        .payments
        .confirm_payment(id, request, 5)
        .await
        .unwrap();

    let order = engines.store.order(id);
    assert!(order.payment_confirmed);
    assert_eq!(order.payment_confirmed_by, Some(5));
    assert_eq!(order.cdp_number.as_deref(), Some("000123"));

    let last = engines.inventory.registrations().pop().unwrap();
    assert_eq!(last.batch_id, batch_id);
    assert_eq!(last.items[0].subtotal, dec!(1240));
}

#[tokio::test]
async fn test_confirm_payment_requires_approved_order() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Calamina", dec!(40)));

    let request = ConfirmPaymentRequest {
        receipt: TestDataFactory::receipt(),
        proof: PaymentProof::link("https://drive.example/f/1"),
    };
    let result = engines.payments.confirm_payment(id, request, BUYER).await;

    assert!(matches!(result, Err(AppError::PreconditionFailed(_))));
    assert!(!engines.store.order(id).payment_confirmed);
}

#[tokio::test]
async fn test_update_receipt_merges_proof() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Pegamento PVC", dec!(2)));
    let batch_id = queue_for_payment(&engines, &[id], dec!(32)).await;
    engines
        .payments
        .pay_batch(pay_batch_request(&batch_id), BUYER)
        .await
        .unwrap();

    let outcome = engines
        .payments
        .update_receipt(
            UpdateReceiptRequest {
                batch_id: batch_id.clone(),
                receipt: ReceiptFields {
                    cdp_type: Some("03".to_string()),
                    cdp_serie: Some("B002".to_string()),
                    cdp_number: Some("4471".to_string()),
                },
                proof: PaymentProof::link("https://drive.example/f/boleta"),
            },
            BUYER,
        )
        .await
        .unwrap();

    assert_eq!(outcome.orders, 1);
    let order = engines.store.order(id);
    assert_eq!(order.cdp_type.as_deref(), Some("03"));
    assert_eq!(order.cdp_number.as_deref(), Some("4471"));
    assert_eq!(order.payment_proof.as_deref(), Some("payment_proofs/transfer-0310.pdf"));
    assert_eq!(order.payment_proof_link.as_deref(), Some("https://drive.example/f/boleta"));
}

#[tokio::test]
async fn test_update_receipt_of_unpaid_batch_is_not_found() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Pegamento PVC", dec!(2)));
    let batch_id = queue_for_payment(&engines, &[id], dec!(32)).await;

    let result = engines
        .payments
        .update_receipt(
            UpdateReceiptRequest {
                batch_id,
                receipt: TestDataFactory::receipt(),
                proof: PaymentProof::default(),
            },
            BUYER,
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delivery_only_after_payment_and_only_once() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Puerta contraplacada", dec!(3)));
    let batch_id = queue_for_payment(&engines, &[id], dec!(540)).await;

    assert!(matches!(
        engines.payments.confirm_delivery(id, None, BUYER).await,
        Err(AppError::PreconditionFailed(_))
    ));

    engines
        .payments
        .pay_batch(pay_batch_request(&batch_id), BUYER)
        .await
        .unwrap();
    engines
        .payments
        .confirm_delivery(id, Some("Recibido en obra".to_string()), 3)
        .await
        .unwrap();

    let order = engines.store.order(id);
    assert!(order.delivery_confirmed);
    assert_eq!(order.delivery_confirmed_by, Some(3));
    assert_eq!(order.delivery_notes.as_deref(), Some("Recibido en obra"));

    assert!(matches!(
        engines.payments.confirm_delivery(id, None, 3).await,
        Err(AppError::PreconditionFailed(_))
    ));

    let stats = engines.queries.stats().await.unwrap();
    assert_eq!(stats.approved, 1);
    assert_eq!(stats.total_approved_amount, dec!(540));
}
