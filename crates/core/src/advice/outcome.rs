use serde::{Deserialize, Serialize};

use super::directive::YearSource;
use super::types::MonthYear;

/// Why a directive was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Not an object, or no integer `month` field.
    MalformedDirective,
    MonthOutOfRange,
    YearOutOfRange,
    /// Removal of a period the advice does not have.
    NothingToRemove,
    /// Addition of a period the advice already has.
    Duplicate,
}

impl SkipReason {
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::MalformedDirective => "Invalid period entry (missing \"month\" field).",
            SkipReason::MonthOutOfRange => "Month outside range 1..12.",
            SkipReason::YearOutOfRange => "Year outside the accepted range.",
            SkipReason::NothingToRemove => "Period not found, nothing to remove.",
            SkipReason::Duplicate => "Period already present, not re-added.",
        }
    }
}

/// A period created by a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedPeriod {
    pub index: usize,
    pub month: u32,
    pub year: i32,
    pub source: YearSource,
}

/// A period deleted by a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedPeriod {
    pub index: usize,
    pub month: u32,
    pub year: i32,
}

/// A directive that was ignored, with the reason.
///
/// `month` and `year` are the resolved values when the directive got far
/// enough to have them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDirective {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    pub reason: SkipReason,
    pub message: String,
}

impl SkippedDirective {
    pub fn new(index: usize, reason: SkipReason, month: Option<i64>, year: Option<i64>) -> Self {
        Self {
            index,
            month,
            year,
            reason,
            message: reason.message().to_string(),
        }
    }

    pub fn malformed(index: usize) -> Self {
        Self::new(index, SkipReason::MalformedDirective, None, None)
    }

    pub(crate) fn for_period(index: usize, reason: SkipReason, period: MonthYear) -> Self {
        Self::new(
            index,
            reason,
            Some(i64::from(period.month)),
            Some(i64::from(period.year)),
        )
    }
}

/// Audit trail of one reconciliation, in directive order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    pub added: Vec<AddedPeriod>,
    pub removed: Vec<RemovedPeriod>,
    pub skipped: Vec<SkippedDirective>,
}

impl ReconciliationOutcome {
    /// Returns true if no period was added or removed.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Number of directives accounted for.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_serializes_as_snake_case_code() {
        let skipped = SkippedDirective::malformed(4);
        let json = serde_json::to_value(&skipped).unwrap();

        assert_eq!(json["reason"], "malformed_directive");
        assert_eq!(json["index"], 4);
        assert!(json.get("month").is_none());
    }

    #[test]
    fn test_skipped_for_period_carries_pair() {
        let skipped =
            SkippedDirective::for_period(1, SkipReason::Duplicate, MonthYear::new(5, 2025));

        assert_eq!(skipped.month, Some(5));
        assert_eq!(skipped.year, Some(2025));
        assert_eq!(skipped.message, SkipReason::Duplicate.message());
    }

    #[test]
    fn test_outcome_counts() {
        let mut outcome = ReconciliationOutcome::default();
        assert!(outcome.is_noop());
        assert!(outcome.is_empty());

        outcome.skipped.push(SkippedDirective::malformed(0));
        assert!(outcome.is_noop());
        assert_eq!(outcome.len(), 1);

        outcome.removed.push(RemovedPeriod {
            index: 1,
            month: 3,
            year: 2025,
        });
        assert!(!outcome.is_noop());
        assert_eq!(outcome.len(), 2);
    }
}
