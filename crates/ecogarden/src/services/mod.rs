//! Request-scoped services sitting between handlers and the core.

pub mod reconciler;
pub mod weather;

pub use reconciler::PeriodReconciler;
pub use weather::WeatherClient;
