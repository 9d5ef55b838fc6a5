//! Period directives: the signed-month wire protocol and its explicit form.
//!
//! On the wire a directive is `{"month": <signed int>, "year": <int?>}`.
//! A positive month adds the period, a negative month removes it. Zero is
//! treated as an add of month 0, which the range check always rejects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::outcome::{SkipReason, SkippedDirective};
use super::types::MonthYear;

/// Inclusive range of years a period may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub const DEFAULT: YearRange = YearRange {
        min: 1970,
        max: 2100,
    };

    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, year: i64) -> bool {
        year >= i64::from(self.min) && year <= i64::from(self.max)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Returns true if `month` is a calendar month (1..=12).
pub fn is_valid_month(month: i64) -> bool {
    (1..=12).contains(&month)
}

/// Whether a directive adds or removes a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodOp {
    Add,
    Remove,
}

/// Where the year of a resolved directive came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearSource {
    /// The caller supplied the year.
    Provided,
    /// The year was filled in from the clock.
    Auto,
}

/// A structurally valid directive in its signed wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDirective {
    pub month: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
}

impl PeriodDirective {
    pub fn add(month: u32, year: Option<i32>) -> Self {
        Self {
            month: i64::from(month),
            year: year.map(i64::from),
        }
    }

    pub fn remove(month: u32, year: Option<i32>) -> Self {
        Self {
            month: -i64::from(month),
            year: year.map(i64::from),
        }
    }

    /// Reads a directive from one element of a JSON list.
    ///
    /// Returns `None` when the element is not an object, has no `month`, or
    /// carries a `month`/`year` that is not an integer. Integer strings such
    /// as `"5"` are accepted.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let month = integer(object.get("month")?)?;
        let year = match object.get("year") {
            None | Some(Value::Null) => None,
            Some(v) => Some(integer(v)?),
        };
        Some(Self { month, year })
    }

    pub fn op(&self) -> PeriodOp {
        if self.month < 0 {
            PeriodOp::Remove
        } else {
            PeriodOp::Add
        }
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A directive with its operator made explicit and its fields validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDirective {
    pub op: PeriodOp,
    pub period: MonthYear,
    pub year_source: YearSource,
}

/// Resolves a wire directive against the current year and the valid range.
///
/// Out-of-range months are rejected before years, and a rejected directive
/// is never partially applied.
pub fn resolve_directive(
    index: usize,
    directive: &PeriodDirective,
    current_year: i32,
    years: YearRange,
) -> Result<ResolvedDirective, SkippedDirective> {
    let month = i64::try_from(directive.month.unsigned_abs()).unwrap_or(i64::MAX);
    let (year, year_source) = match directive.year {
        Some(year) => (year, YearSource::Provided),
        None => (i64::from(current_year), YearSource::Auto),
    };

    if !is_valid_month(month) {
        return Err(SkippedDirective::new(
            index,
            SkipReason::MonthOutOfRange,
            Some(month),
            Some(year),
        ));
    }

    if !years.contains(year) {
        return Err(SkippedDirective::new(
            index,
            SkipReason::YearOutOfRange,
            Some(month),
            Some(year),
        ));
    }

    // Both values were range-checked above.
    let period = MonthYear::new(month as u32, year as i32);

    Ok(ResolvedDirective {
        op: directive.op(),
        period,
        year_source,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_value_accepts_month_and_optional_year() {
        assert_eq!(
            PeriodDirective::from_value(&json!({"month": 5, "year": 2025})),
            Some(PeriodDirective {
                month: 5,
                year: Some(2025)
            })
        );
        assert_eq!(
            PeriodDirective::from_value(&json!({"month": -3})),
            Some(PeriodDirective {
                month: -3,
                year: None
            })
        );
        assert_eq!(
            PeriodDirective::from_value(&json!({"month": "7", "year": null})),
            Some(PeriodDirective {
                month: 7,
                year: None
            })
        );
    }

    #[test]
    fn test_from_value_rejects_malformed_entries() {
        assert_eq!(PeriodDirective::from_value(&json!({"year": 2025})), None);
        assert_eq!(PeriodDirective::from_value(&json!(5)), None);
        assert_eq!(PeriodDirective::from_value(&json!([5, 2025])), None);
        assert_eq!(
            PeriodDirective::from_value(&json!({"month": "may"})),
            None
        );
        assert_eq!(
            PeriodDirective::from_value(&json!({"month": 5, "year": "soon"})),
            None
        );
        assert_eq!(PeriodDirective::from_value(&json!({"month": 4.5})), None);
    }

    #[test]
    fn test_sign_maps_to_operator() {
        assert_eq!(PeriodDirective::add(4, None).op(), PeriodOp::Add);
        assert_eq!(PeriodDirective::remove(4, None).op(), PeriodOp::Remove);
        assert_eq!(
            PeriodDirective {
                month: 0,
                year: None
            }
            .op(),
            PeriodOp::Add
        );
    }

    #[test]
    fn test_resolve_defaults_year_to_current() {
        let resolved =
            resolve_directive(0, &PeriodDirective::add(6, None), 2030, YearRange::DEFAULT)
                .unwrap();

        assert_eq!(resolved.op, PeriodOp::Add);
        assert_eq!(resolved.period, MonthYear::new(6, 2030));
        assert_eq!(resolved.year_source, YearSource::Auto);
    }

    #[test]
    fn test_resolve_takes_absolute_month_for_removals() {
        let resolved = resolve_directive(
            2,
            &PeriodDirective::remove(11, Some(2024)),
            2030,
            YearRange::DEFAULT,
        )
        .unwrap();

        assert_eq!(resolved.op, PeriodOp::Remove);
        assert_eq!(resolved.period, MonthYear::new(11, 2024));
        assert_eq!(resolved.year_source, YearSource::Provided);
    }

    #[test]
    fn test_month_out_of_range_is_rejected_for_any_sign() {
        for month in [0, 13, -13, 100, -100, i64::MIN, i64::MAX] {
            let directive = PeriodDirective {
                month,
                year: Some(2025),
            };
            let skipped =
                resolve_directive(1, &directive, 2025, YearRange::DEFAULT).unwrap_err();
            assert_eq!(skipped.reason, SkipReason::MonthOutOfRange, "month {month}");
            assert_eq!(skipped.index, 1);
        }
    }

    #[test]
    fn test_month_is_checked_before_year() {
        let directive = PeriodDirective {
            month: 13,
            year: Some(1800),
        };
        let skipped = resolve_directive(0, &directive, 2025, YearRange::DEFAULT).unwrap_err();

        assert_eq!(skipped.reason, SkipReason::MonthOutOfRange);
    }

    #[test]
    fn test_year_bounds_are_inclusive() {
        let range = YearRange::new(1970, 2100);

        assert!(resolve_directive(0, &PeriodDirective::add(1, Some(1970)), 2025, range).is_ok());
        assert!(resolve_directive(0, &PeriodDirective::add(1, Some(2100)), 2025, range).is_ok());

        let low = resolve_directive(0, &PeriodDirective::add(1, Some(1969)), 2025, range)
            .unwrap_err();
        let high = resolve_directive(0, &PeriodDirective::add(1, Some(2101)), 2025, range)
            .unwrap_err();

        assert_eq!(low.reason, SkipReason::YearOutOfRange);
        assert_eq!(low.year, Some(1969));
        assert_eq!(high.reason, SkipReason::YearOutOfRange);
    }

    #[test]
    fn test_defaulted_year_is_range_checked_too() {
        let skipped = resolve_directive(
            0,
            &PeriodDirective::add(1, None),
            2200,
            YearRange::DEFAULT,
        )
        .unwrap_err();

        assert_eq!(skipped.reason, SkipReason::YearOutOfRange);
    }
}
