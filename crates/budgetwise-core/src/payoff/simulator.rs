use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BudgetWiseError;
use crate::rounding;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::BudgetWiseResult;

use super::strategy::{priority_order, DebtPayoffStrategy};
use super::{validate_debts, Debt, MAX_PAYOFF_PERIODS};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a multi-debt payoff simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffSimulationInput {
    pub debts: Vec<Debt>,
    pub strategy: DebtPayoffStrategy,
    pub monthly_budget: Money,
}

/// Payment detail for one debt within one simulated month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPeriodDetail {
    pub debt_id: i64,
    pub interest_accrued: Money,
    pub payment_applied: Money,
    pub ending_balance: Money,
}

/// One simulated month. Only debts still open at the start of the month
/// appear in `per_debt`; paid-off debts are permanently excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffPeriod {
    pub period_index: u32,
    pub per_debt: Vec<DebtPeriodDetail>,
    pub total_paid: Money,
}

/// Aggregate outcome of a simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffSummary {
    pub strategy: DebtPayoffStrategy,
    pub months_to_payoff: u32,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    /// Debt ids in the order they reached zero balance. Same-month
    /// completions are listed in priority order.
    pub payoff_order: Vec<i64>,
}

/// Full simulation output: the month-by-month schedule plus the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffOutput {
    pub schedule: Vec<PayoffPeriod>,
    pub summary: PayoffSummary,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate paying off a set of debts under a fixed monthly budget.
///
/// Every month each open debt accrues interest and receives its minimum
/// payment; whatever budget remains cascades down the strategy's priority
/// list within the same month. When a debt reaches zero its minimum stops
/// being owed, which enlarges the surplus available to the next priority
/// debt from the following month on.
pub fn simulate(
    input: &PayoffSimulationInput,
) -> BudgetWiseResult<ComputationOutput<PayoffOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_debts(&input.debts)?;

    if input.monthly_budget.is_sign_negative() {
        return Err(BudgetWiseError::InvalidInput {
            field: "monthly_budget".into(),
            reason: format!("monthly budget must be >= 0, got {}", input.monthly_budget),
        });
    }

    let required_minimums: Money = input
        .debts
        .iter()
        .filter(|d| !rounding::is_zero_or_negative(d.principal_balance))
        .map(|d| d.minimum_payment)
        .sum();
    if input.monthly_budget < required_minimums {
        return Err(BudgetWiseError::InsufficientBudget {
            monthly_budget: input.monthly_budget,
            required_minimums,
        });
    }

    // The priority order is fixed at simulation start and never re-sorted;
    // switching strategies mid-run is unsupported.
    let priority = priority_order(&input.debts, input.strategy);

    let monthly_rates: Vec<Rate> = input
        .debts
        .iter()
        .map(|d| rounding::round_rate(d.annual_interest_rate / dec!(12)))
        .collect();

    let mut balances: Vec<Money> = input
        .debts
        .iter()
        .map(|d| rounding::round_money(d.principal_balance))
        .collect();
    let mut open: Vec<bool> = balances.iter().map(|b| *b > Decimal::ZERO).collect();

    for &i in &priority {
        let first_interest = rounding::round_money(balances[i] * monthly_rates[i]);
        if input.debts[i].minimum_payment < first_interest {
            warnings.push(format!(
                "Debt '{}' has a minimum payment ({}) below its monthly interest accrual ({}); \
                 it only amortizes once surplus reaches it",
                input.debts[i].name, input.debts[i].minimum_payment, first_interest
            ));
        }
    }

    let mut schedule: Vec<PayoffPeriod> = Vec::new();
    let mut payoff_order: Vec<i64> = Vec::new();
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut period_index: u32 = 0;

    while open.iter().any(|&o| o) {
        period_index += 1;
        if period_index > MAX_PAYOFF_PERIODS {
            let remaining: Money = balances
                .iter()
                .zip(&open)
                .filter(|(_, &o)| o)
                .map(|(b, _)| *b)
                .sum();
            return Err(BudgetWiseError::PayoffNotConverging {
                periods: MAX_PAYOFF_PERIODS,
                remaining_balance: remaining,
            });
        }

        let active: Vec<usize> = (0..balances.len()).filter(|&i| open[i]).collect();
        let mut interest_accrued = vec![Decimal::ZERO; balances.len()];
        let mut payment_applied = vec![Decimal::ZERO; balances.len()];

        // 1. Interest accrual on every open balance
        for &i in &active {
            let interest = rounding::round_money(balances[i] * monthly_rates[i]);
            balances[i] = rounding::round_money(balances[i] + interest);
            interest_accrued[i] = interest;
            total_interest += interest;
        }

        // 2. Minimum payments (capped at the remaining balance)
        let mut minimums_applied = Decimal::ZERO;
        for &i in &active {
            let payment = input.debts[i].minimum_payment.min(balances[i]);
            balances[i] = rounding::round_money(balances[i] - payment);
            payment_applied[i] = payment;
            minimums_applied += payment;
        }

        // 3-4. Surplus cascades down the priority list within this month
        let mut surplus = rounding::round_money(input.monthly_budget - minimums_applied);
        for &i in &priority {
            if surplus <= Decimal::ZERO {
                break;
            }
            if !open[i] || balances[i] <= Decimal::ZERO {
                continue;
            }
            let applied = surplus.min(balances[i]);
            balances[i] = rounding::round_money(balances[i] - applied);
            payment_applied[i] = rounding::round_money(payment_applied[i] + applied);
            surplus = rounding::round_money(surplus - applied);
        }

        // Close out debts whose rounded balance reached zero, discarding any
        // fractional residual
        for &i in &priority {
            if open[i] && rounding::is_zero_or_negative(balances[i]) {
                balances[i] = Decimal::ZERO;
                open[i] = false;
                payoff_order.push(input.debts[i].id);
            }
        }

        // 5. Record the period
        let per_debt: Vec<DebtPeriodDetail> = active
            .iter()
            .map(|&i| DebtPeriodDetail {
                debt_id: input.debts[i].id,
                interest_accrued: interest_accrued[i],
                payment_applied: payment_applied[i],
                ending_balance: balances[i],
            })
            .collect();
        let period_total: Money = active.iter().map(|&i| payment_applied[i]).sum();
        total_paid += period_total;
        schedule.push(PayoffPeriod {
            period_index,
            per_debt,
            total_paid: period_total,
        });
    }

    let summary = PayoffSummary {
        strategy: input.strategy,
        months_to_payoff: period_index,
        total_interest_paid: rounding::round_money(total_interest),
        total_paid: rounding::round_money(total_paid),
        payoff_order,
    };

    let output = PayoffOutput { schedule, summary };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt payoff simulation (fixed priority order, monthly interest accrual, surplus rollover)",
        &serde_json::json!({
            "strategy": input.strategy,
            "monthly_budget": input.monthly_budget.to_string(),
            "debt_count": input.debts.len(),
            "max_periods": MAX_PAYOFF_PERIODS,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn debt(id: i64, balance: Decimal, rate: Decimal, minimum: Decimal) -> Debt {
        Debt {
            id,
            name: format!("debt-{id}"),
            principal_balance: balance,
            annual_interest_rate: rate,
            minimum_payment: minimum,
        }
    }

    fn simulate_ok(debts: Vec<Debt>, strategy: DebtPayoffStrategy, budget: Decimal) -> PayoffOutput {
        simulate(&PayoffSimulationInput {
            debts,
            strategy,
            monthly_budget: budget,
        })
        .unwrap()
        .result
    }

    // ---------------------------------------------------------------
    // 1. Zero-interest debt amortizes in balance/payment months
    // ---------------------------------------------------------------
    #[test]
    fn test_zero_interest_single_debt() {
        let out = simulate_ok(
            vec![debt(1, dec!(1000), dec!(0), dec!(100))],
            DebtPayoffStrategy::Avalanche,
            dec!(100),
        );
        assert_eq!(out.summary.months_to_payoff, 10);
        assert_eq!(out.summary.total_interest_paid, dec!(0));
        assert_eq!(out.summary.total_paid, dec!(1000));
        assert_eq!(out.summary.payoff_order, vec![1]);
        assert_eq!(out.schedule.len(), 10);
    }

    // ---------------------------------------------------------------
    // 2. Surplus beyond the minimum accelerates payoff
    // ---------------------------------------------------------------
    #[test]
    fn test_surplus_accelerates_payoff() {
        let out = simulate_ok(
            vec![debt(1, dec!(1000), dec!(0), dec!(100))],
            DebtPayoffStrategy::Avalanche,
            dec!(500),
        );
        assert_eq!(out.summary.months_to_payoff, 2);
        assert_eq!(out.summary.total_paid, dec!(1000));
    }

    // ---------------------------------------------------------------
    // 3. Interest accrues on the running balance at rate/12
    // ---------------------------------------------------------------
    #[test]
    fn test_interest_accrual_known_values() {
        // 12% APR -> 1% monthly
        let out = simulate_ok(
            vec![debt(1, dec!(1200), dec!(0.12), dec!(200))],
            DebtPayoffStrategy::Avalanche,
            dec!(200),
        );
        let first = &out.schedule[0].per_debt[0];
        assert_eq!(first.interest_accrued, dec!(12.00));
        assert_eq!(first.payment_applied, dec!(200));
        // 1200 + 12 - 200
        assert_eq!(first.ending_balance, dec!(1012.00));

        let second = &out.schedule[1].per_debt[0];
        assert_eq!(second.interest_accrued, dec!(10.12));
        assert_eq!(second.ending_balance, dec!(822.12));
    }

    // ---------------------------------------------------------------
    // 4. Avalanche sends surplus to the highest rate first
    // ---------------------------------------------------------------
    #[test]
    fn test_avalanche_targets_highest_rate() {
        let out = simulate_ok(
            vec![
                debt(1, dec!(1000), dec!(0.05), dec!(50)),
                debt(2, dec!(500), dec!(0.20), dec!(50)),
            ],
            DebtPayoffStrategy::Avalanche,
            dec!(200),
        );
        // Debt 2 (20%) receives the surplus and pays off first
        assert_eq!(out.summary.payoff_order, vec![2, 1]);
        let first = &out.schedule[0];
        let d2 = first.per_debt.iter().find(|d| d.debt_id == 2).unwrap();
        assert_eq!(d2.payment_applied, dec!(150));
    }

    // ---------------------------------------------------------------
    // 5. Snowball sends surplus to the smallest balance first
    // ---------------------------------------------------------------
    #[test]
    fn test_snowball_targets_smallest_balance() {
        let out = simulate_ok(
            vec![
                debt(1, dec!(1000), dec!(0.20), dec!(50)),
                debt(2, dec!(500), dec!(0.05), dec!(50)),
            ],
            DebtPayoffStrategy::Snowball,
            dec!(200),
        );
        assert_eq!(out.summary.payoff_order, vec![2, 1]);
    }

    // ---------------------------------------------------------------
    // 6. Rollover: a finished debt's minimum enlarges the surplus, and
    //    leftover surplus cascades within the same month
    // ---------------------------------------------------------------
    #[test]
    fn test_rollover_and_same_month_cascade() {
        let out = simulate_ok(
            vec![
                debt(1, dec!(100), dec!(0), dec!(50)),
                debt(2, dec!(1000), dec!(0), dec!(50)),
            ],
            DebtPayoffStrategy::Snowball,
            dec!(200),
        );

        // Month 1: debt 1 gets 50 minimum + 50 surplus and closes; the
        // remaining 50 surplus falls through to debt 2 in the same month
        let first = &out.schedule[0];
        let d1 = first.per_debt.iter().find(|d| d.debt_id == 1).unwrap();
        let d2 = first.per_debt.iter().find(|d| d.debt_id == 2).unwrap();
        assert_eq!(d1.payment_applied, dec!(100));
        assert_eq!(d1.ending_balance, dec!(0));
        assert_eq!(d2.payment_applied, dec!(100));
        assert_eq!(d2.ending_balance, dec!(900));

        // Month 2 on: debt 1's minimum is no longer owed, so debt 2
        // receives the full budget
        let second = &out.schedule[1];
        assert_eq!(second.per_debt.len(), 1);
        assert_eq!(second.per_debt[0].payment_applied, dec!(200));

        assert_eq!(out.summary.months_to_payoff, 6);
        assert_eq!(out.summary.total_paid, dec!(1100));
        assert_eq!(out.summary.payoff_order, vec![1, 2]);
    }

    // ---------------------------------------------------------------
    // 7. Minimum payment larger than the balance pays only the balance
    // ---------------------------------------------------------------
    #[test]
    fn test_minimum_capped_at_balance() {
        let out = simulate_ok(
            vec![debt(1, dec!(30), dec!(0), dec!(50))],
            DebtPayoffStrategy::Avalanche,
            dec!(50),
        );
        assert_eq!(out.summary.months_to_payoff, 1);
        assert_eq!(out.summary.total_paid, dec!(30));
    }

    // ---------------------------------------------------------------
    // 8. Budget below aggregate minimums is rejected outright
    // ---------------------------------------------------------------
    #[test]
    fn test_insufficient_budget_rejected() {
        let err = simulate(&PayoffSimulationInput {
            debts: vec![
                debt(1, dec!(1000), dec!(0.10), dec!(60)),
                debt(2, dec!(2000), dec!(0.15), dec!(80)),
            ],
            strategy: DebtPayoffStrategy::Avalanche,
            monthly_budget: dec!(139.99),
        })
        .unwrap_err();
        match err {
            BudgetWiseError::InsufficientBudget {
                monthly_budget,
                required_minimums,
            } => {
                assert_eq!(monthly_budget, dec!(139.99));
                assert_eq!(required_minimums, dec!(140));
            }
            other => panic!("expected InsufficientBudget, got {other:?}"),
        }
    }

    // ---------------------------------------------------------------
    // 9. Paid-off debts do not count toward the required minimums
    // ---------------------------------------------------------------
    #[test]
    fn test_closed_debts_excluded_from_budget_check() {
        let out = simulate_ok(
            vec![
                debt(1, dec!(0), dec!(0.10), dec!(500)),
                debt(2, dec!(100), dec!(0), dec!(50)),
            ],
            DebtPayoffStrategy::Avalanche,
            dec!(50),
        );
        assert_eq!(out.summary.months_to_payoff, 2);
        assert_eq!(out.summary.payoff_order, vec![2]);
    }

    // ---------------------------------------------------------------
    // 10. Malformed debts are rejected
    // ---------------------------------------------------------------
    #[test]
    fn test_invalid_debt_rejected() {
        let err = simulate(&PayoffSimulationInput {
            debts: vec![debt(1, dec!(1000), dec!(-0.05), dec!(50))],
            strategy: DebtPayoffStrategy::Avalanche,
            monthly_budget: dec!(100),
        })
        .unwrap_err();
        assert!(matches!(err, BudgetWiseError::InvalidDebt { debt_id: 1, .. }));

        let err = simulate(&PayoffSimulationInput {
            debts: vec![debt(2, dec!(-1), dec!(0.05), dec!(50))],
            strategy: DebtPayoffStrategy::Avalanche,
            monthly_budget: dec!(100),
        })
        .unwrap_err();
        assert!(matches!(err, BudgetWiseError::InvalidDebt { debt_id: 2, .. }));
    }

    // ---------------------------------------------------------------
    // 11. Interest outrunning the budget fails the safety cap
    // ---------------------------------------------------------------
    #[test]
    fn test_payoff_not_converging() {
        // 60% APR on 10k accrues 500/month against a 100 budget
        let err = simulate(&PayoffSimulationInput {
            debts: vec![debt(1, dec!(10000), dec!(0.60), dec!(100))],
            strategy: DebtPayoffStrategy::Avalanche,
            monthly_budget: dec!(100),
        })
        .unwrap_err();
        match err {
            BudgetWiseError::PayoffNotConverging { periods, remaining_balance } => {
                assert_eq!(periods, MAX_PAYOFF_PERIODS);
                assert!(remaining_balance > dec!(10000));
            }
            other => panic!("expected PayoffNotConverging, got {other:?}"),
        }
    }

    // ---------------------------------------------------------------
    // 12. No open debts: empty schedule, zero summary
    // ---------------------------------------------------------------
    #[test]
    fn test_no_open_debts() {
        let out = simulate_ok(vec![], DebtPayoffStrategy::Snowball, dec!(100));
        assert!(out.schedule.is_empty());
        assert_eq!(out.summary.months_to_payoff, 0);
        assert_eq!(out.summary.total_paid, dec!(0));

        let out = simulate_ok(
            vec![debt(1, dec!(0), dec!(0.10), dec!(25))],
            DebtPayoffStrategy::Snowball,
            dec!(0),
        );
        assert!(out.schedule.is_empty());
        assert!(out.summary.payoff_order.is_empty());
    }

    // ---------------------------------------------------------------
    // 13. Conservation: totals equal the sum of recorded periods and
    //     every final balance is exactly zero
    // ---------------------------------------------------------------
    #[test]
    fn test_conservation() {
        let out = simulate_ok(
            vec![
                debt(1, dec!(3500), dec!(0.1899), dec!(70)),
                debt(2, dec!(1200), dec!(0.2499), dec!(35)),
                debt(3, dec!(8000), dec!(0.0649), dec!(160)),
            ],
            DebtPayoffStrategy::Avalanche,
            dec!(400),
        );

        let period_sum: Decimal = out.schedule.iter().map(|p| p.total_paid).sum();
        assert_eq!(out.summary.total_paid, rounding::round_money(period_sum));

        let interest_sum: Decimal = out
            .schedule
            .iter()
            .flat_map(|p| &p.per_debt)
            .map(|d| d.interest_accrued)
            .sum();
        assert_eq!(out.summary.total_interest_paid, rounding::round_money(interest_sum));

        // Principal + interest = total paid (any sub-cent residual at close
        // is discarded, so allow one cent per debt)
        let principal = dec!(3500) + dec!(1200) + dec!(8000);
        let diff = (out.summary.total_paid - (principal + out.summary.total_interest_paid)).abs();
        assert!(diff <= dec!(0.03), "conservation off by {diff}");

        let last = out.schedule.last().unwrap();
        for d in &last.per_debt {
            assert_eq!(d.ending_balance, dec!(0));
        }
        assert_eq!(out.summary.payoff_order.len(), 3);
    }

    // ---------------------------------------------------------------
    // 14. A below-interest minimum still converges via surplus, with a
    //     warning attached
    // ---------------------------------------------------------------
    #[test]
    fn test_below_interest_minimum_warns_but_converges() {
        let output = simulate(&PayoffSimulationInput {
            debts: vec![
                // 24% APR on 5000 accrues 100/month against a 20 minimum
                debt(1, dec!(5000), dec!(0.24), dec!(20)),
            ],
            strategy: DebtPayoffStrategy::Avalanche,
            monthly_budget: dec!(300),
        })
        .unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("below its monthly interest accrual"));
        assert!(output.result.summary.months_to_payoff > 0);
    }
}
