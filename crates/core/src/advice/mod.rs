mod directive;
mod error;
mod outcome;
mod reconcile;
mod requests;
mod types;

pub use directive::{
    is_valid_month, resolve_directive, PeriodDirective, PeriodOp, ResolvedDirective, YearRange,
    YearSource,
};
pub use error::AdviceError;
pub use outcome::{
    AddedPeriod, ReconciliationOutcome, RemovedPeriod, SkipReason, SkippedDirective,
};
pub use reconcile::ReconcilePlan;
pub use requests::{
    validate_content, validate_period_query, CreateAdviceRequest, UpdateAdviceRequest,
};
pub use types::{Advice, MonthYear, Period, Role, User};
