//! API request types for advice operations.
//!
//! Pure data types plus the validation rules that apply to them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::directive::{is_valid_month, PeriodDirective, YearRange};
use super::error::AdviceError;
use super::types::{Advice, MonthYear};

/// Request payload for creating an advice.
///
/// `periods` entries are `{month, year}` objects. Entries missing either
/// field, or outside the valid ranges, are ignored; repeated pairs collapse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAdviceRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub periods: Option<Vec<Value>>,
}

impl CreateAdviceRequest {
    /// Builds the advice for `user_id`.
    pub fn into_advice(self, user_id: Uuid, years: YearRange) -> Result<Advice, AdviceError> {
        let content = self.content.ok_or(AdviceError::MissingField("content"))?;
        let content = validate_content(&content)?;
        let periods = self.periods.ok_or(AdviceError::MissingField("periods"))?;

        let mut advice = Advice::new(user_id, content);
        for value in &periods {
            let Some(PeriodDirective {
                month,
                year: Some(year),
            }) = PeriodDirective::from_value(value)
            else {
                continue;
            };
            if !is_valid_month(month) || !years.contains(year) {
                continue;
            }
            advice.add_period(MonthYear::new(month as u32, year as i32));
        }

        Ok(advice)
    }
}

/// Request payload for updating an advice.
///
/// `periods` uses the signed-month directive protocol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAdviceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<Value>>,
}

impl UpdateAdviceRequest {
    /// Returns the trimmed new content, if one was supplied.
    pub fn validated_content(&self) -> Result<Option<String>, AdviceError> {
        self.content.as_deref().map(validate_content).transpose()
    }
}

/// Trims `content` and rejects it when nothing is left.
pub fn validate_content(content: &str) -> Result<String, AdviceError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AdviceError::EmptyContent);
    }
    Ok(trimmed.to_string())
}

/// Validates the (month, year?) of a listing query.
///
/// A missing year resolves to `current_year`.
pub fn validate_period_query(
    month: i64,
    year: Option<i64>,
    current_year: i32,
    years: YearRange,
) -> Result<MonthYear, AdviceError> {
    if !is_valid_month(month) {
        return Err(AdviceError::InvalidMonth(month));
    }
    let year = year.unwrap_or(i64::from(current_year));
    if !years.contains(year) {
        return Err(AdviceError::InvalidYear(year));
    }
    Ok(MonthYear::new(month as u32, year as i32))
}
