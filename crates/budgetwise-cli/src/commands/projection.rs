use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use budgetwise_core::projection::{project, ProjectionInput, RecurringBill};

use crate::input;

/// Bills always come from the input document; the window and starting
/// balance may be given there or overridden on the command line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionDocument {
    bills: Vec<RecurringBill>,
    starting_balance: Option<Decimal>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// Arguments for the cash-flow projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON or YAML input file with bills (and optionally
    /// startingBalance, startDate, endDate)
    #[arg(long)]
    pub input: Option<String>,

    /// Starting balance (overrides the input document)
    #[arg(long)]
    pub starting_balance: Option<Decimal>,

    /// Window start, inclusive (overrides the input document)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Window end, inclusive (overrides the input document)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document: ProjectionDocument = input::read_required(args.input.as_deref(), "project")?;

    let starting_balance = args
        .starting_balance
        .or(document.starting_balance)
        .ok_or("--starting-balance is required (or provide \"startingBalance\" in the input)")?;
    let start_date = args
        .start
        .or(document.start_date)
        .ok_or("--start is required (or provide \"startDate\" in the input)")?;
    let end_date = args
        .end
        .or(document.end_date)
        .ok_or("--end is required (or provide \"endDate\" in the input)")?;

    let result = project(&ProjectionInput {
        starting_balance,
        bills: document.bills,
        start_date,
        end_date,
    })?;
    Ok(serde_json::to_value(result)?)
}
