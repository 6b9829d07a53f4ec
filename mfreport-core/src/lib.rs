//! mfreport-core: Core types for the monthly expense aggregation pipeline

pub mod category;
pub mod error;
pub mod record;
pub mod stage;
pub mod totals;

pub use category::{CategoryGroup, CategoryGroupTable, DEFAULT_GROUP_LABELS};
pub use error::{PipelineError, Result, RowDiagnostic};
pub use record::ExpenseRecord;
pub use stage::run_stage;
pub use totals::{AggregateResult, CategoryTotals, ReportingMonth};
