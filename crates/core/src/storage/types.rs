use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::advice::Period;

/// Period creations and deletions for one advice, committed atomically.
///
/// May also carry a content update so the whole edit lands in one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodBatch {
    pub advice_id: Uuid,
    pub creates: Vec<Period>,
    /// Ids of the periods to delete.
    pub deletes: Vec<Uuid>,
    pub content: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PeriodBatch {
    pub fn new(advice_id: Uuid) -> Self {
        Self {
            advice_id,
            creates: Vec::new(),
            deletes: Vec::new(),
            content: None,
            updated_at: None,
        }
    }

    pub fn with_create(mut self, period: Period) -> Self {
        self.creates.push(period);
        self
    }

    pub fn with_delete(mut self, period_id: Uuid) -> Self {
        self.deletes.push(period_id);
        self
    }

    /// Sets the new advice content and its update timestamp.
    pub fn with_content(mut self, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.content = Some(content.into());
        self.updated_at = Some(at);
        self
    }

    /// Stamps the update time without changing the content.
    pub fn touched_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Returns true if committing this batch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.deletes.is_empty() && self.content.is_none()
    }
}
