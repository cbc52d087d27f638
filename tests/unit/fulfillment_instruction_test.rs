// Fulfillment strategy resolution
//
// Per-order inventory instructions arrive as loose JSON; each must resolve to exactly
// one strategy, with anything incomplete treated as a regular purchase.

use compras::approvals::{FulfillmentInstruction, SplitInstruction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn parse(json: serde_json::Value) -> FulfillmentInstruction {
    let split: SplitInstruction = serde_json::from_value(json).unwrap();
    FulfillmentInstruction::from(&split)
}

#[test]
fn test_missing_instruction_is_external() {
    assert_eq!(FulfillmentInstruction::for_order(None), FulfillmentInstruction::External);
}

#[test]
fn test_inventory_without_purchase() {
    let instruction = parse(serde_json::json!({
        "source_type": "inventory",
        "inventory_item_id": 31,
        "qty_from_inventory": 12,
        "reference_price": 50
    }));

    assert_eq!(
        instruction,
        FulfillmentInstruction::Inventory {
            inventory_item_id: Some(31),
            qty_from_inventory: dec!(12),
            reference_price: Some(dec!(50)),
        }
    );
}

#[test]
fn test_inventory_with_zero_to_buy_is_still_inventory() {
    let instruction = parse(serde_json::json!({
        "source_type": "inventory",
        "qty_from_inventory": 5,
        "qty_to_buy": 0
    }));

    assert!(matches!(instruction, FulfillmentInstruction::Inventory { .. }));
}

#[test]
fn test_inventory_with_quantity_to_buy_falls_back_to_purchase() {
    let instruction = parse(serde_json::json!({
        "source_type": "inventory",
        "qty_from_inventory": 5,
        "qty_to_buy": 3
    }));

    assert!(instruction.is_external());
}

#[test]
fn test_split_needs_stock_quantity() {
    let instruction = parse(serde_json::json!({
        "source_type": "split",
        "inventory_item_id": 8,
        "qty_from_inventory": 40,
        "qty_to_buy": 60,
        "reference_price": 12.5
    }));
    assert_eq!(
        instruction,
        FulfillmentInstruction::Split {
            inventory_item_id: Some(8),
            qty_from_inventory: dec!(40),
            qty_to_buy: dec!(60),
            reference_price: dec!(12.5),
        }
    );

    let without_stock = parse(serde_json::json!({
        "source_type": "split",
        "qty_from_inventory": 0,
        "qty_to_buy": 60
    }));
    assert!(without_stock.is_external());
}

#[test]
fn test_split_defaults_missing_price_to_zero() {
    let instruction = parse(serde_json::json!({
        "source_type": "split",
        "qty_from_inventory": 1,
        "qty_to_buy": 2
    }));

    match instruction {
        FulfillmentInstruction::Split { reference_price, inventory_item_id, .. } => {
            assert_eq!(reference_price, Decimal::ZERO);
            assert_eq!(inventory_item_id, None);
        }
        other => panic!("expected split, got {:?}", other),
    }
}

#[test]
fn test_external_source_ignores_quantities() {
    let instruction = parse(serde_json::json!({
        "source_type": "external",
        "qty_from_inventory": 10
    }));

    assert!(instruction.is_external());
}
