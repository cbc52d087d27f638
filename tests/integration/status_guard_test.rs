//! Guarded status writes
//!
//! A concurrent writer that moves an order between an engine's precondition check and
//! its write must make the whole operation fail with nothing kept.

#[path = "../helpers/mod.rs"]
mod helpers;

use compras::approvals::ApproveOrderRequest;
use compras::core::{AppError, Currency};
use compras::modules::orders::models::OrderStatus;
use compras::payments::PayBulkRequest;
use helpers::*;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_batch_approval_detects_order_taken_after_check() {
    let engines = TestEngines::new();
    let a = engines.seed(TestDataFactory::material_order(1, "Cemento", dec!(10)));
    let b = engines.seed(TestDataFactory::material_order(2, "Arena", dec!(3)));
    let before = engines.store.orders();

    engines.store.race_after_check(Box::new(move |orders| {
        if let Some(order) = orders.get_mut(&b) {
            order.status = OrderStatus::Approved;
        }
    }));

    let request = TestDataFactory::batch_request(
        vec![a, b],
        &[(a, dec!(100)), (b, dec!(60))],
        Currency::PEN,
    );
    let result = engines.approvals.approve_batch(request, BUYER).await;

    assert!(matches!(result, Err(AppError::PreconditionFailed(_))));
    assert_eq!(engines.store.orders(), before);
    assert_eq!(engines.store.commit_count(), 0);
    assert!(engines.inventory.registrations().is_empty());
}

#[tokio::test]
async fn test_single_approval_detects_order_taken_after_check() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Cemento", dec!(10)));

    engines.store.race_after_check(Box::new(move |orders| {
        if let Some(order) = orders.get_mut(&id) {
            order.status = OrderStatus::Rejected;
        }
    }));

    let result = engines
        .approvals
        .approve(
            id,
            ApproveOrderRequest {
                amount: dec!(250),
                invoice: TestDataFactory::invoice(Currency::PEN),
            },
            BUYER,
        )
        .await;

    assert!(matches!(result, Err(AppError::PreconditionFailed(_))));
    assert_eq!(engines.store.order(id).status, OrderStatus::Pending);
    assert_eq!(engines.store.order(id).amount, None);
}

#[tokio::test]
async fn test_rejection_detects_order_taken_after_check() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Cemento", dec!(10)));

    engines.store.race_after_check(Box::new(move |orders| {
        if let Some(order) = orders.get_mut(&id) {
            order.status = OrderStatus::ToPay;
        }
    }));

    let result = engines.approvals.reject(id, Some("Not needed".to_string()), BUYER).await;

    assert!(matches!(result, Err(AppError::PreconditionFailed(_))));
    assert_eq!(engines.store.order(id).status, OrderStatus::Pending);
    assert_eq!(engines.store.order(id).notes, None);
}

#[tokio::test]
async fn test_bulk_payment_detects_order_taken_after_check() {
    let engines = TestEngines::new();
    let a = engines.seed(TestDataFactory::material_order(1, "Tubo", dec!(10)));
    let b = engines.seed(TestDataFactory::material_order(2, "Codo", dec!(10)));
    let request = TestDataFactory::batch_request(
        vec![a, b],
        &[(a, dec!(20)), (b, dec!(20))],
        Currency::PEN,
    );
    engines.approvals.approve_batch(request, BUYER).await.unwrap();
    let before = engines.store.orders();

    engines.store.race_after_check(Box::new(move |orders| {
        if let Some(order) = orders.get_mut(&a) {
            order.status = OrderStatus::Approved;
        }
    }));

    let result = engines
        .payments
        .pay_bulk(
            PayBulkRequest {
                order_ids: vec![a, b],
                prices: [(a, dec!(20)), (b, dec!(20))].into_iter().collect(),
                invoice: TestDataFactory::invoice(Currency::PEN),
            },
            BUYER,
        )
        .await;

    assert!(matches!(result, Err(AppError::PreconditionFailed(_))));
    assert_eq!(engines.store.orders(), before);
}

#[tokio::test]
async fn test_processed_orders_cannot_be_processed_again() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Cemento", dec!(10)));
    let request = TestDataFactory::batch_request(vec![id], &[(id, dec!(100))], Currency::PEN);
    engines.approvals.approve_batch(request.clone(), BUYER).await.unwrap();

    assert!(matches!(
        engines.approvals.approve_batch(request, BUYER).await,
        Err(AppError::PreconditionFailed(_))
    ));
    assert!(matches!(
        engines.approvals.reject(id, None, BUYER).await,
        Err(AppError::PreconditionFailed(_))
    ));
}

#[tokio::test]
async fn test_mark_to_pay_rejects_usd_order_without_rate() {
    let engines = TestEngines::new();
    let mut order = TestDataFactory::material_order(1, "Motor trifasico", dec!(1));
    order.currency = Currency::USD;
    let id = engines.seed(order);

    let result = engines.approvals.mark_to_pay(id, BUYER).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(engines.store.order(id).status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_mark_to_pay_refuses_approved_order() {
    let engines = TestEngines::new();
    let mut order = TestDataFactory::material_order(1, "Cemento", dec!(10));
    order.status = OrderStatus::Approved;
    let id = engines.seed(order);

    assert!(matches!(
        engines.approvals.mark_to_pay(id, BUYER).await,
        Err(AppError::PreconditionFailed(_))
    ));
}
