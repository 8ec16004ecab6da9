use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use budgetwise_core::payoff::{
    analyze_consolidation, compare_strategies, simulate, ConsolidationInput, Debt,
    DebtPayoffStrategy, PayoffSimulationInput, StrategyComparisonInput,
};

use crate::input;

/// Strategy flag mirrored onto the engine enum.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyFlag {
    Avalanche,
    Snowball,
}

impl From<StrategyFlag> for DebtPayoffStrategy {
    fn from(flag: StrategyFlag) -> Self {
        match flag {
            StrategyFlag::Avalanche => DebtPayoffStrategy::Avalanche,
            StrategyFlag::Snowball => DebtPayoffStrategy::Snowball,
        }
    }
}

/// Debts always come from the input document; strategy and budget may be
/// given there or overridden on the command line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayoffDocument {
    debts: Vec<Debt>,
    strategy: Option<DebtPayoffStrategy>,
    monthly_budget: Option<Decimal>,
}

/// Arguments for the payoff simulation
#[derive(Args)]
pub struct PayoffArgs {
    /// Path to JSON or YAML input file with debts (and optionally strategy
    /// and monthlyBudget)
    #[arg(long)]
    pub input: Option<String>,

    /// Payoff strategy (overrides the input document)
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyFlag>,

    /// Monthly budget (overrides the input document)
    #[arg(long)]
    pub budget: Option<Decimal>,
}

/// Arguments for the strategy comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON or YAML input file with debts (and optionally
    /// monthlyBudget)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly budget (overrides the input document)
    #[arg(long)]
    pub budget: Option<Decimal>,
}

/// Arguments for the consolidation analysis
#[derive(Args)]
pub struct ConsolidateArgs {
    /// Path to JSON or YAML input file with debts (and optionally
    /// consolidationRate)
    #[arg(long)]
    pub input: Option<String>,

    /// Offered consolidation rate as a fraction, e.g. 0.0899
    #[arg(long)]
    pub rate: Option<Decimal>,
}

pub fn run_payoff(args: PayoffArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document: PayoffDocument = input::read_required(args.input.as_deref(), "payoff")?;

    let strategy = args
        .strategy
        .map(DebtPayoffStrategy::from)
        .or(document.strategy)
        .ok_or("--strategy is required (or provide \"strategy\" in the input)")?;
    let monthly_budget = args
        .budget
        .or(document.monthly_budget)
        .ok_or("--budget is required (or provide \"monthlyBudget\" in the input)")?;

    let result = simulate(&PayoffSimulationInput {
        debts: document.debts,
        strategy,
        monthly_budget,
    })?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document: PayoffDocument = input::read_required(args.input.as_deref(), "compare")?;

    let monthly_budget = args
        .budget
        .or(document.monthly_budget)
        .ok_or("--budget is required (or provide \"monthlyBudget\" in the input)")?;

    let result = compare_strategies(&StrategyComparisonInput {
        debts: document.debts,
        monthly_budget,
    })?;
    Ok(serde_json::to_value(result)?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsolidateDocument {
    debts: Vec<Debt>,
    consolidation_rate: Option<Decimal>,
}

pub fn run_consolidate(args: ConsolidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document: ConsolidateDocument =
        input::read_required(args.input.as_deref(), "consolidate")?;

    let consolidation_rate = args
        .rate
        .or(document.consolidation_rate)
        .ok_or("--rate is required (or provide \"consolidationRate\" in the input)")?;

    let result = analyze_consolidation(&ConsolidationInput {
        debts: document.debts,
        consolidation_rate,
    })?;
    Ok(serde_json::to_value(result)?)
}
