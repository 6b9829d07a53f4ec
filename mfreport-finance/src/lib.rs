//! mfreport-finance: record extraction, category aggregation, and the end-to-end pipeline

pub mod aggregator;
pub mod extractor;
pub mod pipeline;

pub use aggregator::CategoryAggregator;
pub use extractor::{
    ExtractedExpenses, category_group, category_label, extract, records_outside_month,
    reporting_month,
};
pub use pipeline::{PipelineConfig, aggregate_export};
