//! Pure reconciliation planning.
//!
//! The shell resolves each directive, looks the period up in the store and
//! feeds both into a [`ReconcilePlan`]. The plan overlays the store state
//! with the changes staged so far in the same call, so a later directive for
//! the same (month, year) sees the effect of an earlier one:
//!
//! - add, add: the second is a duplicate
//! - add, remove: the pending creation is cancelled
//! - remove, add: the pending deletion is cancelled and the row kept
//! - remove, remove: the second has nothing to remove

use uuid::Uuid;

use super::directive::{PeriodOp, ResolvedDirective};
use super::outcome::{
    AddedPeriod, ReconciliationOutcome, RemovedPeriod, SkipReason, SkippedDirective,
};
use super::types::{MonthYear, Period};
use crate::storage::PeriodBatch;

/// Staged changes and audit trail for one reconciliation call.
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    advice_id: Uuid,
    creates: Vec<Period>,
    deletes: Vec<Period>,
    outcome: ReconciliationOutcome,
}

impl ReconcilePlan {
    pub fn new(advice_id: Uuid) -> Self {
        Self {
            advice_id,
            creates: Vec::new(),
            deletes: Vec::new(),
            outcome: ReconciliationOutcome::default(),
        }
    }

    /// Records a directive rejected before the lookup.
    pub fn skip(&mut self, skipped: SkippedDirective) {
        self.outcome.skipped.push(skipped);
    }

    /// Applies a resolved directive.
    ///
    /// `stored` is the row the store holds for the directive's period, if any.
    pub fn apply(&mut self, index: usize, directive: &ResolvedDirective, stored: Option<&Period>) {
        let key = directive.period;
        let staged_create = self.creates.iter().position(|p| p.matches(key));
        let staged_delete = self.deletes.iter().position(|p| p.matches(key));

        match directive.op {
            PeriodOp::Remove => {
                if let Some(pos) = staged_create {
                    self.creates.remove(pos);
                } else if let (Some(row), None) = (stored, staged_delete) {
                    self.deletes.push(row.clone());
                } else {
                    self.skip_period(index, SkipReason::NothingToRemove, key);
                    return;
                }
                self.outcome.removed.push(RemovedPeriod {
                    index,
                    month: key.month,
                    year: key.year,
                });
            }
            PeriodOp::Add => {
                let present =
                    staged_create.is_some() || (stored.is_some() && staged_delete.is_none());
                if present {
                    self.skip_period(index, SkipReason::Duplicate, key);
                    return;
                }
                match staged_delete {
                    Some(pos) => {
                        self.deletes.remove(pos);
                    }
                    None => self
                        .creates
                        .push(Period::new(self.advice_id, key.month, key.year)),
                }
                self.outcome.added.push(AddedPeriod {
                    index,
                    month: key.month,
                    year: key.year,
                    source: directive.year_source,
                });
            }
        }
    }

    fn skip_period(&mut self, index: usize, reason: SkipReason, key: MonthYear) {
        self.outcome
            .skipped
            .push(SkippedDirective::for_period(index, reason, key));
    }

    pub fn outcome(&self) -> &ReconciliationOutcome {
        &self.outcome
    }

    /// Splits the plan into the batch to commit and the audit trail.
    pub fn into_parts(self) -> (PeriodBatch, ReconciliationOutcome) {
        let batch = PeriodBatch {
            advice_id: self.advice_id,
            creates: self.creates,
            deletes: self.deletes.into_iter().map(|p| p.id).collect(),
            content: None,
            updated_at: None,
        };
        (batch, self.outcome)
    }
}
