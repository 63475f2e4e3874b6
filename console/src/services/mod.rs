pub mod analytics;
pub mod cycle;
pub mod documents;

pub use analytics::AnalyticsService;
pub use cycle::{CycleToken, RecomputeGuard};
pub use documents::{DocumentEditor, SubmitOutcome};
