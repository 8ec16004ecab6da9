use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BudgetWiseError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid debt '{debt_id}': {reason}")]
    InvalidDebt { debt_id: i64, reason: String },

    #[error(
        "Insufficient budget: {monthly_budget} does not cover the {required_minimums} \
         required for minimum payments"
    )]
    InsufficientBudget {
        monthly_budget: Decimal,
        required_minimums: Decimal,
    },

    #[error(
        "Payoff not converging: balances still open after {periods} periods \
         (remaining: {remaining_balance})"
    )]
    PayoffNotConverging {
        periods: u32,
        remaining_balance: Decimal,
    },

    #[error("Invalid range: end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BudgetWiseError {
    fn from(e: serde_json::Error) -> Self {
        BudgetWiseError::SerializationError(e.to_string())
    }
}
