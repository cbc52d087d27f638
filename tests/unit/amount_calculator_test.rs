// Property-based tests for order amount math
//
// - USD amounts convert to PEN at the given rate, with no IGV the total equals the
//   PEN amount
// - With IGV enabled the tax is amount_pen * rate / 100 and the total adds it
// - Rounding to cents moves each part by at most half a cent, the rebuilt total by
//   at most one cent

use compras::core::Currency;
use compras::taxes::{AmountCalculator, IgvSettings};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn cents(value: u64) -> Decimal {
    Decimal::new(value as i64, 2)
}

/// Exchange rate with 4 decimal places, between 0.0001 and 10.0000
fn rate(value: u32) -> Decimal {
    Decimal::new(value as i64, 4)
}

proptest! {
    #[test]
    fn test_usd_converts_at_rate(
        amount in 0u64..10_000_000_000u64,
        rate_units in 1u32..=100_000u32,
        igv_rate in 0u32..=10_000u32
    ) {
        let amount = cents(amount);
        let rate = rate(rate_units);
        let amounts = AmountCalculator::calculate_amounts(
            amount,
            Currency::USD,
            Some(rate),
            false,
            Decimal::new(igv_rate as i64, 2),
        )
        .unwrap();

        prop_assert_eq!(amounts.amount_pen, amount * rate);
        prop_assert_eq!(amounts.igv_amount, Decimal::ZERO);
        prop_assert_eq!(amounts.total_with_igv, amounts.amount_pen);
    }

    #[test]
    fn test_pen_ignores_rate(
        amount in 0u64..10_000_000_000u64,
        rate_units in 1u32..=100_000u32
    ) {
        let amount = cents(amount);
        let amounts = AmountCalculator::calculate_amounts(
            amount,
            Currency::PEN,
            Some(rate(rate_units)),
            false,
            dec!(18),
        )
        .unwrap();

        prop_assert_eq!(amounts.amount_pen, amount);
    }

    #[test]
    fn test_igv_is_share_of_pen_amount(
        amount in 0u64..10_000_000_000u64,
        igv_rate in 0u32..=10_000u32
    ) {
        let amount = cents(amount);
        let igv_rate = Decimal::new(igv_rate as i64, 2);
        let amounts = AmountCalculator::for_settings(
            amount,
            Currency::PEN,
            None,
            IgvSettings { enabled: true, rate: igv_rate },
        )
        .unwrap();

        prop_assert_eq!(amounts.igv_amount, amounts.amount_pen * igv_rate / dec!(100));
        prop_assert_eq!(amounts.total_with_igv, amounts.amount_pen + amounts.igv_amount);
        prop_assert!(amounts.igv_amount <= amounts.amount_pen);
    }

    #[test]
    fn test_rounding_stays_within_half_a_cent(
        amount in 0u64..10_000_000_000u64,
        rate_units in 1u32..=100_000u32,
        igv_rate in 0u32..=10_000u32
    ) {
        let amounts = AmountCalculator::calculate_amounts(
            cents(amount),
            Currency::USD,
            Some(rate(rate_units)),
            true,
            Decimal::new(igv_rate as i64, 2),
        )
        .unwrap();
        let rounded = amounts.rounded();
        let half_cent = dec!(0.005);

        prop_assert!((rounded.amount_pen - amounts.amount_pen).abs() <= half_cent);
        prop_assert!((rounded.igv_amount - amounts.igv_amount).abs() <= half_cent);
        prop_assert!((rounded.total_with_igv - amounts.total_with_igv).abs() <= dec!(0.01));
        prop_assert_eq!(rounded.total_with_igv, rounded.amount_pen + rounded.igv_amount);
    }
}

#[test]
fn test_known_usd_invoice() {
    let amounts = AmountCalculator::calculate_amounts(
        dec!(1000),
        Currency::USD,
        Some(dec!(3.7520)),
        true,
        dec!(18),
    )
    .unwrap()
    .rounded();

    assert_eq!(amounts.amount_pen, dec!(3752.00));
    assert_eq!(amounts.igv_amount, dec!(675.36));
    assert_eq!(amounts.total_with_igv, dec!(4427.36));
}

#[test]
fn test_igv_rate_bounds() {
    assert!(AmountCalculator::validate_igv_rate(dec!(18)).is_ok());
    assert!(AmountCalculator::validate_igv_rate(dec!(0)).is_ok());
    assert!(AmountCalculator::validate_igv_rate(dec!(-1)).is_err());
    assert!(AmountCalculator::validate_igv_rate(dec!(100.01)).is_err());
    assert!(AmountCalculator::validate_igv_rate(dec!(18.125)).is_err());
}
