//! Derivations over parsed expense records: the category group of each
//! record and the reporting month of the whole export.

use std::sync::LazyLock;

use mfreport_core::{
    CategoryGroup, CategoryGroupTable, ExpenseRecord, PipelineError, ReportingMonth, Result,
    run_stage,
};
use mfreport_ingest::{ColumnLayout, parse_export_text};
use regex::Regex;
use tracing::warn;

// Unanchored: the date may carry surrounding text.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})/([0-9]{2})/[0-9]{2}").expect("date pattern is valid")
});

/// Group selected by the leading digit of a minor category, e.g. `"2. コンビニ"`.
pub fn category_group(minor_category: &str) -> Result<CategoryGroup> {
    minor_category
        .chars()
        .next()
        .and_then(CategoryGroup::from_digit)
        .ok_or_else(|| PipelineError::CategoryFormat(minor_category.to_string()))
}

/// Display label of the record's group.
pub fn category_label<'t>(record: &ExpenseRecord, table: &'t CategoryGroupTable) -> Result<&'t str> {
    Ok(table.label(category_group(&record.minor_category)?))
}

// Only the shape is checked: "2023/02/29" still reports as 2023-02.
fn year_month(date: &str) -> Option<ReportingMonth> {
    let caps = DATE_RE.captures(date)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    Some(ReportingMonth::new(year, month))
}

/// Records after the first whose date does not fall in `month`.
pub fn records_outside_month(records: &[ExpenseRecord], month: ReportingMonth) -> usize {
    records
        .iter()
        .skip(1)
        .filter(|r| year_month(&r.date) != Some(month))
        .count()
}

/// Month of the first record. Later records are assumed to share it.
pub fn reporting_month(records: &[ExpenseRecord]) -> Result<ReportingMonth> {
    let first = records.first().ok_or(PipelineError::EmptyDataset)?;
    let month = year_month(&first.date).ok_or_else(|| PipelineError::DateFormat(first.date.clone()))?;

    let outside = records_outside_month(records, month);
    if outside > 0 {
        warn!(%month, outside, "records dated outside the reporting month");
    }

    Ok(month)
}

/// Records of one export plus the month they report on
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedExpenses {
    pub records: Vec<ExpenseRecord>,
    pub reporting_month: ReportingMonth,
}

/// Parse decoded export text and derive its reporting month.
pub fn extract(text: &str, layout: &ColumnLayout) -> Result<ExtractedExpenses> {
    let records = run_stage("parse_export", || parse_export_text(text, layout))?;
    let reporting_month = run_stage("reporting_month", || reporting_month(&records))?;
    Ok(ExtractedExpenses {
        records,
        reporting_month,
    })
}
