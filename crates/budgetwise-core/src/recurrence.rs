use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often a recurring obligation comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    OneTime,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

impl Frequency {
    fn days_per_period(self) -> Option<u64> {
        match self {
            Frequency::Weekly => Some(7),
            Frequency::BiWeekly => Some(14),
            _ => None,
        }
    }

    fn months_per_period(self) -> Option<u32> {
        match self {
            Frequency::Monthly => Some(1),
            Frequency::Quarterly => Some(3),
            Frequency::SemiAnnually => Some(6),
            Frequency::Annually => Some(12),
            _ => None,
        }
    }
}

/// A recurrence rule: a frequency anchored to the obligation's due date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceSpec {
    pub frequency: Frequency,
    pub anchor_date: NaiveDate,
}

/// `due_date` plus `periods` whole periods, always measured from `due_date`
/// itself so that day-of-month congruence survives month-end clamping
/// (Jan 31 + 2 months is Mar 31, not Mar 28 via a clamped Feb 28).
fn advance(due_date: NaiveDate, frequency: Frequency, periods: u32) -> Option<NaiveDate> {
    if let Some(days) = frequency.days_per_period() {
        due_date.checked_add_days(Days::new(days * periods as u64))
    } else if let Some(months) = frequency.months_per_period() {
        due_date.checked_add_months(Months::new(months.checked_mul(periods)?))
    } else {
        Some(due_date)
    }
}

/// Advance a due date to its next occurrence strictly after `reference_date`.
///
/// A ONE_TIME obligation never recurs: its due date is returned unchanged
/// regardless of the reference (if overdue it stays overdue until the caller
/// resolves it). A due date already strictly after the reference is returned
/// as-is. Otherwise the result is the earliest `due_date + k * period` that
/// falls strictly after `reference_date`.
pub fn next_occurrence(
    due_date: NaiveDate,
    frequency: Frequency,
    reference_date: NaiveDate,
) -> NaiveDate {
    if frequency == Frequency::OneTime || due_date > reference_date {
        return due_date;
    }

    // Each candidate is strictly later than the last, so the loop is bounded
    // by the finite reference date.
    let mut k: u32 = 1;
    loop {
        match advance(due_date, frequency, k) {
            Some(candidate) if candidate <= reference_date => k += 1,
            Some(candidate) => return candidate,
            // chrono date range exhausted; nothing later to return
            None => return due_date,
        }
    }
}

/// Every occurrence of `spec` landing within `[window_start, window_end]`
/// inclusive, in ascending order. Lazy and restartable: a pure function of
/// its inputs with no cursor state shared between calls.
pub fn occurrences(
    spec: &RecurrenceSpec,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Occurrences {
    Occurrences {
        frequency: spec.frequency,
        anchor: spec.anchor_date,
        window_start,
        window_end,
        next_index: 0,
        done: false,
    }
}

/// Iterator over the occurrences of a recurrence within a date window.
#[derive(Debug, Clone)]
pub struct Occurrences {
    frequency: Frequency,
    anchor: NaiveDate,
    window_start: NaiveDate,
    window_end: NaiveDate,
    next_index: u32,
    done: bool,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }
        loop {
            if self.frequency == Frequency::OneTime && self.next_index > 0 {
                self.done = true;
                return None;
            }
            let candidate = match advance(self.anchor, self.frequency, self.next_index) {
                Some(d) => d,
                None => {
                    self.done = true;
                    return None;
                }
            };
            self.next_index += 1;
            if candidate > self.window_end {
                self.done = true;
                return None;
            }
            if candidate >= self.window_start {
                return Some(candidate);
            }
            // Before the window: keep advancing
        }
    }
}
