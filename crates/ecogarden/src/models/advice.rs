use serde::Serialize;

use ecogarden_core::advice::{Advice, ReconciliationOutcome};

/// Body of a successful advice update: the stored advice and what the
/// period directives did.
#[derive(Debug, Serialize)]
pub struct UpdateAdviceResponse {
    pub advice: Advice,
    pub changes: ReconciliationOutcome,
}
