use serde::{Deserialize, Serialize};

use crate::rounding;

use super::Debt;

/// Priority policy for applying budget surplus beyond aggregate minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebtPayoffStrategy {
    /// Highest interest rate first.
    Avalanche,
    /// Smallest balance first.
    Snowball,
}

/// Payoff priority list: indices of the open debts (rounded balance > 0),
/// sorted by strategy. Computed once before the first period and never
/// re-sorted mid-run.
///
/// Tie-breaks are fixed for determinism: avalanche orders by rate
/// descending, then balance descending, then id ascending; snowball by
/// balance ascending, then rate descending, then id ascending.
pub fn priority_order(debts: &[Debt], strategy: DebtPayoffStrategy) -> Vec<usize> {
    let mut order: Vec<usize> = (0..debts.len())
        .filter(|&i| !rounding::is_zero_or_negative(debts[i].principal_balance))
        .collect();

    order.sort_by(|&a, &b| {
        let (da, db) = (&debts[a], &debts[b]);
        match strategy {
            DebtPayoffStrategy::Avalanche => {
                rounding::compare_rate(db.annual_interest_rate, da.annual_interest_rate)
                    .then_with(|| rounding::compare(db.principal_balance, da.principal_balance))
                    .then_with(|| da.id.cmp(&db.id))
            }
            DebtPayoffStrategy::Snowball => {
                rounding::compare(da.principal_balance, db.principal_balance)
                    .then_with(|| {
                        rounding::compare_rate(db.annual_interest_rate, da.annual_interest_rate)
                    })
                    .then_with(|| da.id.cmp(&db.id))
            }
        }
    });

    order
}
