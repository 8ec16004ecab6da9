pub mod comparison;
pub mod consolidation;
pub mod simulator;
pub mod strategy;

pub use comparison::{compare_strategies, StrategyComparison, StrategyComparisonInput};
pub use consolidation::{analyze_consolidation, loan_payoff, ConsolidationAnalysis, ConsolidationInput};
pub use simulator::{simulate, PayoffOutput, PayoffPeriod, PayoffSimulationInput, PayoffSummary};
pub use strategy::DebtPayoffStrategy;

use serde::{Deserialize, Serialize};

use crate::error::BudgetWiseError;
use crate::types::{Money, Rate};
use crate::BudgetWiseResult;

/// Safety bound on every iterative payoff loop in the crate: 1200 monthly
/// periods (100 years). Exceeding it means interest is outrunning payment
/// capacity and no finite schedule exists.
pub const MAX_PAYOFF_PERIODS: u32 = 1200;

/// A debt snapshot supplied by the caller at simulation start. The engine
/// treats it as read-only; results come back as new schedules, never as
/// mutations of caller state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: i64,
    pub name: String,
    pub principal_balance: Money,
    pub annual_interest_rate: Rate,
    pub minimum_payment: Money,
}

pub(crate) fn validate_debts(debts: &[Debt]) -> BudgetWiseResult<()> {
    for debt in debts {
        if debt.principal_balance.is_sign_negative() {
            return Err(BudgetWiseError::InvalidDebt {
                debt_id: debt.id,
                reason: format!("principal balance must be >= 0, got {}", debt.principal_balance),
            });
        }
        if debt.annual_interest_rate.is_sign_negative() {
            return Err(BudgetWiseError::InvalidDebt {
                debt_id: debt.id,
                reason: format!(
                    "annual interest rate must be >= 0, got {}",
                    debt.annual_interest_rate
                ),
            });
        }
        if debt.minimum_payment.is_sign_negative() {
            return Err(BudgetWiseError::InvalidDebt {
                debt_id: debt.id,
                reason: format!("minimum payment must be >= 0, got {}", debt.minimum_payment),
            });
        }
    }
    Ok(())
}
