mod order_amounts;

pub use order_amounts::{IgvSettings, OrderAmounts, DEFAULT_IGV_RATE};
