pub mod error;
pub mod payoff;
pub mod projection;
pub mod recurrence;
pub mod rounding;
pub mod types;

pub use error::BudgetWiseError;
pub use types::*;

/// Standard result type for all budgetwise operations
pub type BudgetWiseResult<T> = Result<T, BudgetWiseError>;
