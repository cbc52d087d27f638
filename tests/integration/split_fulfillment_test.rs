//! Split fulfillment
//!
//! A split order keeps its row for the part that is bought and gains an approved
//! sibling row for the part taken from stock.

#[path = "../helpers/mod.rs"]
mod helpers;

use compras::core::{AppError, Currency};
use compras::modules::orders::models::{OrderStatus, SourceType};
use helpers::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_split_conserves_quantity_and_links_rows() {
    let engines = TestEngines::new();
    let original_id = engines.seed(TestDataFactory::material_order(5, "Fierro corrugado 1/2\"", dec!(100)));

    let mut request =
        TestDataFactory::batch_request(vec![original_id], &[(original_id, dec!(1800))], Currency::PEN);
    request.inventory_splits.insert(
        original_id,
        TestDataFactory::split(77, dec!(40), dec!(60), dec!(30)),
    );

    let summary = engines.approvals.approve_batch(request, BUYER).await.unwrap();

    assert_eq!(summary.routed_to_purchase, 1);
    assert_eq!(summary.fulfilled_from_inventory, 1);
    assert_eq!(
        summary.message,
        "1 routed to payment, 1 fulfilled from inventory (delivered)"
    );

    let original = engines.store.order(original_id);
    let siblings = engines.store.children_of(original_id);
    assert_eq!(siblings.len(), 1);
    let sibling = &siblings[0];

    assert_eq!(original.status, OrderStatus::ToPay);
    assert_eq!(original.source_type, SourceType::External);
    assert_eq!(original.materials[0].qty, dec!(60));
    assert_eq!(original.materials[0].original_qty, Some(dec!(100)));
    assert_eq!(original.amount, Some(dec!(1800)));

    assert_eq!(sibling.status, OrderStatus::Approved);
    assert_eq!(sibling.source_type, SourceType::Inventory);
    assert_eq!(sibling.parent_order_id, Some(original_id));
    assert_eq!(sibling.item_number, original.item_number);
    assert_eq!(sibling.project_id, original.project_id);
    assert_eq!(sibling.description, "Fierro corrugado 1/2\" [De Inventario]");
    assert_eq!(sibling.materials[0].qty, dec!(40));
    assert_eq!(sibling.amount, Some(Decimal::ZERO));
    assert_eq!(sibling.total_with_igv, Some(Decimal::ZERO));
    assert_eq!(sibling.reference_price, Some(dec!(30)));
    assert_eq!(sibling.inventory_item_id, Some(77));
    assert!(sibling.payment_confirmed);
    assert!(sibling.delivery_confirmed);
    assert_eq!(sibling.batch_id, original.batch_id);
    assert_eq!(sibling.created_by, original.created_by);

    assert_eq!(
        sibling.materials[0].qty + original.materials[0].qty,
        original.materials[0].original_qty.unwrap()
    );

    assert_eq!(
        engines.inventory.deductions(),
        vec![Deduction {
            item_id: Some(77),
            qty: dec!(40),
            order_id: sibling.id,
        }]
    );

    let registrations = engines.inventory.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].items[0].qty, dec!(60));
    assert_eq!(registrations[0].items[0].subtotal, dec!(1800));
}

#[tokio::test]
async fn test_split_quantities_must_add_up() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Cemento Sol", dec!(100)));
    let before = engines.store.orders();

    let mut request = TestDataFactory::batch_request(vec![id], &[(id, dec!(500))], Currency::PEN);
    request
        .inventory_splits
        .insert(id, TestDataFactory::split(3, dec!(40), dec!(50), dec!(25)));

    let result = engines.approvals.approve_batch(request, BUYER).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(engines.store.orders(), before);
    assert!(engines.inventory.deductions().is_empty());
}

#[tokio::test]
async fn test_split_failure_in_batch_rolls_back_earlier_orders() {
    let engines = TestEngines::new();
    let plain = engines.seed(TestDataFactory::material_order(1, "Arena fina", dec!(6)));
    let split = engines.seed(TestDataFactory::material_order(2, "Piedra chancada", dec!(10)));
    let before = engines.store.orders();

    let mut request = TestDataFactory::batch_request(
        vec![plain, split],
        &[(plain, dec!(300)), (split, dec!(200))],
        Currency::PEN,
    );
    request
        .inventory_splits
        .insert(split, TestDataFactory::split(3, dec!(4), dec!(4), dec!(20)));

    assert!(engines.approvals.approve_batch(request, BUYER).await.is_err());
    assert_eq!(engines.store.orders(), before);
}

#[tokio::test]
async fn test_splitting_twice_in_one_project_keeps_item_numbers_unique() {
    let engines = TestEngines::new();
    let first = engines.seed(TestDataFactory::material_order(1, "Tubo 2\"", dec!(10)));
    let second = engines.seed(TestDataFactory::material_order(2, "Tubo 3\"", dec!(10)));

    let mut request = TestDataFactory::batch_request(
        vec![first, second],
        &[(first, dec!(50)), (second, dec!(70))],
        Currency::PEN,
    );
    request
        .inventory_splits
        .insert(first, TestDataFactory::split(1, dec!(3), dec!(7), dec!(5)));
    request
        .inventory_splits
        .insert(second, TestDataFactory::split(2, dec!(6), dec!(4), dec!(7)));

    engines.approvals.approve_batch(request, BUYER).await.unwrap();

    assert_eq!(engines.store.orders().len(), 4);
    assert_eq!(engines.store.children_of(first)[0].item_number, 1);
    assert_eq!(engines.store.children_of(second)[0].item_number, 2);
}

#[tokio::test]
async fn test_split_sibling_is_visible_as_delivered() {
    let engines = TestEngines::new();
    let id = engines.seed(TestDataFactory::material_order(1, "Madera tornillo", dec!(20)));

    let mut request = TestDataFactory::batch_request(vec![id], &[(id, dec!(400))], Currency::PEN);
    request
        .inventory_splits
        .insert(id, TestDataFactory::split(11, dec!(5), dec!(15), dec!(12)));
    engines.approvals.approve_batch(request, BUYER).await.unwrap();

    let delivered = engines.queries.delivered().await.unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].order.parent_order_id, Some(id));
    assert_eq!(delivered[0].project_name, PROJECT_NAME);

    let to_pay = engines.queries.to_pay().await.unwrap();
    assert_eq!(to_pay.len(), 1);
    assert_eq!(to_pay[0].order.id, id);
}
