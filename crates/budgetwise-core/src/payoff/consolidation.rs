use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BudgetWiseError;
use crate::rounding;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::BudgetWiseResult;

use super::{validate_debts, Debt, MAX_PAYOFF_PERIODS};

// ---------------------------------------------------------------------------
// Single-loan payoff
// ---------------------------------------------------------------------------

/// Outcome of amortizing one loan at a fixed monthly payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayoff {
    pub months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
}

/// Amortize a single principal at `annual_rate` with a fixed monthly
/// payment: months to zero, total interest, total paid.
pub fn loan_payoff(
    principal: Money,
    annual_rate: Rate,
    monthly_payment: Money,
) -> BudgetWiseResult<LoanPayoff> {
    if principal.is_sign_negative() {
        return Err(BudgetWiseError::InvalidInput {
            field: "principal".into(),
            reason: format!("principal must be >= 0, got {principal}"),
        });
    }
    if annual_rate.is_sign_negative() {
        return Err(BudgetWiseError::InvalidInput {
            field: "annual_rate".into(),
            reason: format!("annual rate must be >= 0, got {annual_rate}"),
        });
    }
    if monthly_payment <= Decimal::ZERO {
        return Err(BudgetWiseError::InvalidInput {
            field: "monthly_payment".into(),
            reason: "monthly payment must be greater than zero".into(),
        });
    }

    let monthly_rate = rounding::round_rate(annual_rate / dec!(12));
    let mut balance = rounding::round_money(principal);
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut months: u32 = 0;

    while !rounding::is_zero_or_negative(balance) {
        if months >= MAX_PAYOFF_PERIODS {
            return Err(BudgetWiseError::PayoffNotConverging {
                periods: MAX_PAYOFF_PERIODS,
                remaining_balance: balance,
            });
        }
        let interest = rounding::round_money(balance * monthly_rate);
        if monthly_payment <= interest {
            // The balance can only grow; fail fast instead of walking to the cap
            return Err(BudgetWiseError::InvalidInput {
                field: "monthly_payment".into(),
                reason: format!(
                    "monthly payment {monthly_payment} does not cover the {interest} of \
                     interest accruing each month; the loan never amortizes"
                ),
            });
        }
        balance = rounding::round_money(balance + interest);
        let payment = monthly_payment.min(balance);
        balance = rounding::round_money(balance - payment);
        total_interest += interest;
        total_paid += payment;
        months += 1;
    }

    Ok(LoanPayoff {
        months,
        total_interest: rounding::round_money(total_interest),
        total_paid: rounding::round_money(total_paid),
    })
}

// ---------------------------------------------------------------------------
// Consolidation analysis
// ---------------------------------------------------------------------------

/// Input for a consolidation analysis: the debts as they stand and the
/// offered consolidation rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationInput {
    pub debts: Vec<Debt>,
    pub consolidation_rate: Rate,
}

/// Current situation vs a single consolidated loan paid with the same
/// aggregate monthly amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationAnalysis {
    pub total_current_debt: Money,
    pub total_current_minimum_payments: Money,
    pub current_total_interest: Money,
    pub current_payoff_months: u32,
    pub consolidated_loan_amount: Money,
    pub consolidated_interest_rate: Rate,
    pub consolidated_monthly_payment: Money,
    pub consolidated_total_interest: Money,
    pub consolidated_payoff_months: u32,
    pub interest_savings: Money,
    pub time_savings_months: i64,
    pub is_beneficial: bool,
    pub recommendation: String,
    pub benefits: Vec<String>,
    pub considerations: Vec<String>,
}

struct MinimumPaymentBaseline {
    months: u32,
    total_interest: Money,
}

/// Aggregate payoff when every debt receives only its own minimum payment.
/// Debts whose minimum cannot outrun interest never amortize; they fall
/// back to a conservative estimate (cap months, interest of twice the
/// balance) with a warning.
fn minimum_payment_baseline(debts: &[Debt], warnings: &mut Vec<String>) -> MinimumPaymentBaseline {
    let mut months: u32 = 0;
    let mut total_interest = Decimal::ZERO;

    for debt in debts {
        if rounding::is_zero_or_negative(debt.principal_balance) {
            continue;
        }
        match loan_payoff(
            debt.principal_balance,
            debt.annual_interest_rate,
            debt.minimum_payment,
        ) {
            Ok(payoff) => {
                months = months.max(payoff.months);
                total_interest += payoff.total_interest;
            }
            Err(_) => {
                warnings.push(format!(
                    "Debt '{}' never amortizes at its minimum payment; using a conservative \
                     estimate for the current-situation baseline",
                    debt.name
                ));
                months = MAX_PAYOFF_PERIODS;
                total_interest += debt.principal_balance * dec!(2);
            }
        }
    }

    MinimumPaymentBaseline {
        months,
        total_interest: rounding::round_money(total_interest),
    }
}

/// Compare the current debts, each paid at its own minimum, against one
/// consolidated loan at the offered rate paid with the same total monthly
/// amount.
pub fn analyze_consolidation(
    input: &ConsolidationInput,
) -> BudgetWiseResult<ComputationOutput<ConsolidationAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_debts(&input.debts)?;
    if input.consolidation_rate.is_sign_negative() {
        return Err(BudgetWiseError::InvalidInput {
            field: "consolidation_rate".into(),
            reason: format!("consolidation rate must be >= 0, got {}", input.consolidation_rate),
        });
    }

    let open_debts: Vec<&Debt> = input
        .debts
        .iter()
        .filter(|d| !rounding::is_zero_or_negative(d.principal_balance))
        .collect();
    if open_debts.is_empty() {
        return Err(BudgetWiseError::InvalidInput {
            field: "debts".into(),
            reason: "at least one debt with a positive balance is required".into(),
        });
    }

    let total_debt: Money =
        rounding::round_money(open_debts.iter().map(|d| d.principal_balance).sum());
    let total_minimums: Money = open_debts.iter().map(|d| d.minimum_payment).sum();

    let current = minimum_payment_baseline(&input.debts, &mut warnings);

    // Consolidated scenario: one loan, same total monthly outlay
    let consolidated = loan_payoff(total_debt, input.consolidation_rate, total_minimums)?;

    let interest_savings = current.total_interest - consolidated.total_interest;
    let time_savings_months = current.months as i64 - consolidated.months as i64;
    let is_beneficial = interest_savings > Decimal::ZERO || time_savings_months > 0;

    let mut benefits: Vec<String> = Vec::new();
    let mut considerations: Vec<String> = Vec::new();

    let recommendation = if is_beneficial {
        benefits.push("Lower overall interest rate".into());
        benefits.push(format!(
            "Simplified payment management (one payment instead of {})",
            open_debts.len()
        ));
        if interest_savings > Decimal::ZERO {
            benefits.push(format!("Save {interest_savings} in total interest"));
        }
        if time_savings_months > 0 {
            benefits.push(format!("Pay off debt {time_savings_months} months earlier"));
        }
        format!(
            "Consolidation is recommended: it could save {interest_savings} in interest over \
             the life of the loans."
        )
    } else {
        considerations
            .push("The offered rate is not meaningfully below the current blended rate".into());
        considerations.push("Interest savings would be negligible or negative".into());
        "Consolidation at this rate offers no advantage; consider negotiating a lower rate or \
         an accelerated payoff strategy instead."
            .to_string()
    };

    considerations.push("Confirm you qualify for the consolidation loan rate".into());
    considerations.push("Account for any origination or balance-transfer fees".into());
    considerations.push("Avoid taking on new debt after consolidating".into());

    let analysis = ConsolidationAnalysis {
        total_current_debt: total_debt,
        total_current_minimum_payments: rounding::round_money(total_minimums),
        current_total_interest: current.total_interest,
        current_payoff_months: current.months,
        consolidated_loan_amount: total_debt,
        consolidated_interest_rate: input.consolidation_rate,
        consolidated_monthly_payment: rounding::round_money(total_minimums),
        consolidated_total_interest: consolidated.total_interest,
        consolidated_payoff_months: consolidated.months,
        interest_savings,
        time_savings_months,
        is_beneficial,
        recommendation,
        benefits,
        considerations,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt consolidation analysis (single loan at offered rate vs minimum-payment baseline)",
        &serde_json::json!({
            "consolidation_rate": input.consolidation_rate.to_string(),
            "debt_count": open_debts.len(),
            "consolidated_payment_equals_current_minimums": true,
        }),
        warnings,
        elapsed,
        analysis,
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

    // ---------------------------------------------------------------
    // 1. Zero-rate loan: months is a plain division
    // ---------------------------------------------------------------
    #[test]
    fn test_loan_payoff_zero_rate() {
        let payoff = loan_payoff(dec!(1200), dec!(0), dec!(100)).unwrap();
        assert_eq!(payoff.months, 12);
        assert_eq!(payoff.total_interest, dec!(0));
        assert_eq!(payoff.total_paid, dec!(1200));
    }

    // ---------------------------------------------------------------
    // 2. Known amortization: 1000 at 12% APR, 100/month
    // ---------------------------------------------------------------
    #[test]
    fn test_loan_payoff_known_schedule() {
        let payoff = loan_payoff(dec!(1000), dec!(0.12), dec!(100)).unwrap();
        // Month 1: 10.00 interest, month 2: 9.10, ... pays off in 11 months
        assert_eq!(payoff.months, 11);
        assert!(payoff.total_interest > dec!(55) && payoff.total_interest < dec!(65));
        assert_eq!(
            payoff.total_paid,
            dec!(1000) + payoff.total_interest
        );
    }

    // ---------------------------------------------------------------
    // 3. Payment at or below monthly interest never amortizes
    // ---------------------------------------------------------------
    #[test]
    fn test_loan_payoff_payment_below_interest() {
        // 24% APR on 10_000 accrues 200/month
        let err = loan_payoff(dec!(10000), dec!(0.24), dec!(200)).unwrap_err();
        assert!(matches!(err, BudgetWiseError::InvalidInput { .. }));

        let err = loan_payoff(dec!(10000), dec!(0.24), dec!(0)).unwrap_err();
        assert!(matches!(err, BudgetWiseError::InvalidInput { .. }));
    }

    // ---------------------------------------------------------------
    // 4. A lower consolidation rate saves interest and time
    // ---------------------------------------------------------------
    #[test]
    fn test_consolidation_beneficial_at_lower_rate() {
        let input = ConsolidationInput {
            debts: vec![
                debt(1, dec!(5000), dec!(0.2199), dec!(150)),
                debt(2, dec!(3000), dec!(0.1899), dec!(90)),
            ],
            consolidation_rate: dec!(0.08),
        };
        let out = analyze_consolidation(&input).unwrap().result;
        assert_eq!(out.total_current_debt, dec!(8000));
        assert_eq!(out.consolidated_monthly_payment, dec!(240));
        assert!(out.interest_savings > dec!(0));
        assert!(out.is_beneficial);
        assert!(!out.benefits.is_empty());
    }

    // ---------------------------------------------------------------
    // 5. A higher consolidation rate is not beneficial
    // ---------------------------------------------------------------
    #[test]
    fn test_consolidation_not_beneficial_at_higher_rate() {
        let input = ConsolidationInput {
            debts: vec![
                debt(1, dec!(5000), dec!(0.06), dec!(150)),
                debt(2, dec!(3000), dec!(0.05), dec!(90)),
            ],
            consolidation_rate: dec!(0.24),
        };
        let out = analyze_consolidation(&input).unwrap().result;
        assert!(out.interest_savings < dec!(0));
        assert!(!out.is_beneficial);
        assert!(out.recommendation.contains("no advantage"));
    }

    // ---------------------------------------------------------------
    // 6. Non-amortizing debt falls back to the conservative baseline
    // ---------------------------------------------------------------
    #[test]
    fn test_consolidation_with_non_amortizing_debt() {
        let input = ConsolidationInput {
            debts: vec![
                // 10/month against 100/month of interest
                debt(1, dec!(5000), dec!(0.24), dec!(10)),
                debt(2, dec!(2000), dec!(0.10), dec!(300)),
            ],
            consolidation_rate: dec!(0.10),
        };
        let output = analyze_consolidation(&input).unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("never amortizes"));
        let out = output.result;
        assert_eq!(out.current_payoff_months, MAX_PAYOFF_PERIODS);
        // Conservative estimate dominates, so consolidation looks beneficial
        assert!(out.is_beneficial);
    }

    // ---------------------------------------------------------------
    // 7. No open debts is an input error
    // ---------------------------------------------------------------
    #[test]
    fn test_consolidation_requires_open_debts() {
        let input = ConsolidationInput {
            debts: vec![debt(1, dec!(0), dec!(0.10), dec!(50))],
            consolidation_rate: dec!(0.08),
        };
        assert!(matches!(
            analyze_consolidation(&input).unwrap_err(),
            BudgetWiseError::InvalidInput { .. }
        ));
    }
}
