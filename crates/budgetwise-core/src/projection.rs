use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BudgetWiseError;
use crate::recurrence::{occurrences, RecurrenceSpec};
use crate::rounding;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::BudgetWiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A recurring obligation fed into the projection. A positive amount is an
/// outflow; a negative amount is an inflow (income travels through the same
/// path with its sign carried by the amount, not a separate code path).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringBill {
    pub name: String,
    pub amount: Money,
    pub recurrence: RecurrenceSpec,
}

/// Input for a cash-flow projection over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInput {
    pub starting_balance: Money,
    pub bills: Vec<RecurringBill>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One dated ledger line. The amount is signed from the balance's point of
/// view: negative for a bill payment, positive for income.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowEntry {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub running_balance: Money,
}

/// The projected ledger and its totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_balance: Money,
    pub entries: Vec<CashFlowEntry>,
    pub ending_balance: Money,
    pub total_outflow: Money,
    pub total_inflow: Money,
    pub net_cash_flow: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project a running balance across every bill occurrence inside
/// `[start_date, end_date]` inclusive.
///
/// The start date serves as both window start and recurrence reference, so
/// an occurrence landing exactly on it is included. The projector performs
/// no interest or income modeling of its own; it is a pure ledger replay.
pub fn project(
    input: &ProjectionInput,
) -> BudgetWiseResult<ComputationOutput<ProjectionResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.end_date < input.start_date {
        return Err(BudgetWiseError::InvalidRange {
            start: input.start_date,
            end: input.end_date,
        });
    }

    // Collect occurrences bill by bill; a stable sort on date alone then
    // preserves input bill order for same-day entries
    let mut dated: Vec<(NaiveDate, usize)> = Vec::new();
    for (index, bill) in input.bills.iter().enumerate() {
        for date in occurrences(&bill.recurrence, input.start_date, input.end_date) {
            dated.push((date, index));
        }
    }
    dated.sort_by(|a, b| a.0.cmp(&b.0));

    let starting_balance = rounding::round_money(input.starting_balance);
    let mut running_balance = starting_balance;
    let mut total_outflow = Decimal::ZERO;
    let mut total_inflow = Decimal::ZERO;
    let mut went_negative_on: Option<NaiveDate> = None;

    let mut entries: Vec<CashFlowEntry> = Vec::with_capacity(dated.len());
    for (date, index) in dated {
        let bill = &input.bills[index];
        let amount = rounding::round_money(bill.amount);
        running_balance = rounding::round_money(running_balance - amount);
        if amount > Decimal::ZERO {
            total_outflow += amount;
        } else {
            total_inflow -= amount;
        }
        if running_balance < Decimal::ZERO && went_negative_on.is_none() {
            went_negative_on = Some(date);
        }
        entries.push(CashFlowEntry {
            date,
            description: bill.name.clone(),
            amount: -amount,
            running_balance,
        });
    }

    if let Some(date) = went_negative_on {
        warnings.push(format!("Projected balance first goes negative on {date}"));
    }

    let result = ProjectionResult {
        start_date: input.start_date,
        end_date: input.end_date,
        starting_balance,
        ending_balance: running_balance,
        total_outflow: rounding::round_money(total_outflow),
        total_inflow: rounding::round_money(total_inflow),
        net_cash_flow: rounding::round_money(running_balance - starting_balance),
        entries,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cash-flow projection (recurring bill occurrences replayed against a starting balance)",
        &serde_json::json!({
            "start_date": input.start_date.to_string(),
            "end_date": input.end_date.to_string(),
            "bill_count": input.bills.len(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
