pub mod currency;
pub mod error;
pub mod timezone;

pub use currency::Currency;
pub use error::{AppError, Result};
pub use timezone::LimaClock;

/// Surrogate key of a purchase order
pub type OrderId = u64;

/// Owning project of a purchase order
pub type ProjectId = u64;

/// Authenticated user performing an operation
pub type ActorId = u64;
