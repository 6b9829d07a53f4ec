//! Category aggregator: sums expenditures into a fixed, caller-ordered set of buckets.

use std::collections::HashMap;

use mfreport_core::{
    CategoryGroupTable, CategoryTotals, ExpenseRecord, PipelineError, Result, RowDiagnostic,
};

use crate::extractor::category_label;

/// Buckets keyed by the configured category list
#[derive(Debug, Clone)]
pub struct CategoryAggregator {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl CategoryAggregator {
    /// Fix the bucket set. Duplicate labels are rejected.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let mut index = HashMap::with_capacity(labels.len());
        let mut ordered = Vec::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            let label = label.as_ref().to_string();
            if index.insert(label.clone(), i).is_some() {
                return Err(PipelineError::InvalidCategoryList(format!(
                    "duplicate label: {}",
                    label
                )));
            }
            ordered.push(label);
        }
        Ok(Self {
            labels: ordered,
            index,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Absolute spend per bucket.
    ///
    /// Rows excluded from calculation and rows with a non-negative amount
    /// are skipped. A row whose group label has no bucket is an error, as is
    /// a bucket whose absolute total does not fit in `u64`.
    pub fn sum_by_category(
        &self,
        records: &[ExpenseRecord],
        table: &CategoryGroupTable,
    ) -> Result<CategoryTotals> {
        // Widened so no run of i64 amounts can wrap.
        let mut running = vec![0i128; self.labels.len()];

        for record in records {
            if !record.include_in_calculation {
                continue;
            }
            if record.amount_yen >= 0 {
                continue;
            }

            let label = category_label(record, table)?;
            let slot = *self
                .index
                .get(label)
                .ok_or_else(|| PipelineError::CategoryNotConfigured(label.to_string()))?;
            running[slot] = running[slot]
                .checked_add(i128::from(record.amount_yen))
                .ok_or_else(|| total_overflow(label))?;
        }

        let mut entries = Vec::with_capacity(self.labels.len());
        for (label, total) in self.labels.iter().zip(running) {
            let total = u64::try_from(total.unsigned_abs()).map_err(|_| total_overflow(label))?;
            entries.push((label.clone(), total));
        }
        Ok(CategoryTotals::from_ordered(entries))
    }
}

fn total_overflow(label: &str) -> PipelineError {
    PipelineError::Parse(vec![RowDiagnostic::whole_file(format!(
        "total for {} does not fit in u64 yen",
        label
    ))])
}
