//! Reconciles period directives against an advice's stored periods.
//!
//! Each directive is checked for structure, resolved against the clock and
//! the configured year range, looked up in the store and fed to a
//! [`ReconcilePlan`]. The staged changes are committed as one batch.
//! Calls for the same advice are serialized so lookups and commit see a
//! consistent state.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use ecogarden_core::advice::{
    resolve_directive, PeriodDirective, ReconcilePlan, ReconciliationOutcome, SkippedDirective,
    YearRange,
};
use ecogarden_core::clock::Clock;
use ecogarden_core::storage::{AdviceRepository, Result};

use crate::locks::KeyedLocks;

/// Applies period directives to advice records.
pub struct PeriodReconciler {
    repository: Arc<dyn AdviceRepository>,
    clock: Arc<dyn Clock>,
    years: YearRange,
    locks: KeyedLocks<Uuid>,
}

impl PeriodReconciler {
    pub fn new(
        repository: Arc<dyn AdviceRepository>,
        clock: Arc<dyn Clock>,
        years: YearRange,
    ) -> Self {
        Self {
            repository,
            clock,
            years,
            locks: KeyedLocks::new(),
        }
    }

    /// Applies `directives` to the periods of `advice_id`, in order.
    ///
    /// `content`, when given, is committed in the same batch as the period
    /// changes. Invalid directives are reported in the outcome, never as
    /// errors; only a persistence failure fails the call, and then nothing
    /// is applied.
    pub async fn reconcile(
        &self,
        advice_id: Uuid,
        directives: &[Value],
        content: Option<String>,
    ) -> Result<ReconciliationOutcome> {
        let _guard = self.locks.lock(advice_id).await;

        let now = self.clock.now();
        let current_year = self.clock.current_year();
        let mut plan = ReconcilePlan::new(advice_id);

        for (index, value) in directives.iter().enumerate() {
            let Some(directive) = PeriodDirective::from_value(value) else {
                plan.skip(SkippedDirective::malformed(index));
                continue;
            };

            let resolved = match resolve_directive(index, &directive, current_year, self.years) {
                Ok(resolved) => resolved,
                Err(skipped) => {
                    plan.skip(skipped);
                    continue;
                }
            };

            let stored = self
                .repository
                .find_period(advice_id, resolved.period)
                .await?;
            plan.apply(index, &resolved, stored.as_ref());
        }

        let (mut batch, outcome) = plan.into_parts();
        if let Some(content) = content {
            batch = batch.with_content(content, now);
        }

        if batch.is_empty() {
            tracing::debug!(advice_id = %advice_id, skipped = outcome.skipped.len(), "Nothing to commit");
            return Ok(outcome);
        }

        self.repository
            .commit_period_batch(&batch.touched_at(now))
            .await
            .inspect_err(|e| {
                tracing::error!(advice_id = %advice_id, error = %e, "Period batch commit failed");
            })?;

        tracing::info!(
            advice_id = %advice_id,
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            skipped = outcome.skipped.len(),
            "Periods reconciled"
        );

        Ok(outcome)
    }
}
