use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use budgetwise_core::recurrence::{next_occurrence, occurrences, Frequency, RecurrenceSpec};

/// Bill frequency flag mirrored onto the engine enum.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyFlag {
    OneTime,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

impl From<FrequencyFlag> for Frequency {
    fn from(flag: FrequencyFlag) -> Self {
        match flag {
            FrequencyFlag::OneTime => Frequency::OneTime,
            FrequencyFlag::Weekly => Frequency::Weekly,
            FrequencyFlag::BiWeekly => Frequency::BiWeekly,
            FrequencyFlag::Monthly => Frequency::Monthly,
            FrequencyFlag::Quarterly => Frequency::Quarterly,
            FrequencyFlag::SemiAnnually => Frequency::SemiAnnually,
            FrequencyFlag::Annually => Frequency::Annually,
        }
    }
}

/// Arguments for advancing a due date
#[derive(Args)]
pub struct NextDueArgs {
    /// Current due date (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: NaiveDate,

    /// Bill frequency
    #[arg(long, value_enum)]
    pub frequency: FrequencyFlag,

    /// Reference date the result must fall strictly after (YYYY-MM-DD)
    #[arg(long)]
    pub reference: NaiveDate,
}

/// Arguments for listing occurrences in a window
#[derive(Args)]
pub struct OccurrencesArgs {
    /// Anchor due date of the recurrence (YYYY-MM-DD)
    #[arg(long)]
    pub anchor: NaiveDate,

    /// Bill frequency
    #[arg(long, value_enum)]
    pub frequency: FrequencyFlag,

    /// Window start, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Window end, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,
}

pub fn run_next_due(args: NextDueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let frequency: Frequency = args.frequency.into();
    let next = next_occurrence(args.due_date, frequency, args.reference);
    Ok(json!({
        "dueDate": args.due_date,
        "frequency": frequency,
        "referenceDate": args.reference,
        "nextDueDate": next,
    }))
}

pub fn run_occurrences(args: OccurrencesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let frequency: Frequency = args.frequency.into();
    let spec = RecurrenceSpec {
        frequency,
        anchor_date: args.anchor,
    };
    let dates: Vec<NaiveDate> = occurrences(&spec, args.start, args.end).collect();
    Ok(json!({
        "anchorDate": args.anchor,
        "frequency": frequency,
        "windowStart": args.start,
        "windowEnd": args.end,
        "count": dates.len(),
        "occurrences": dates,
    }))
}
