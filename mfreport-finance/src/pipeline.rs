//! Bytes-to-aggregate pipeline: decode, parse, extract, aggregate.

use mfreport_core::{
    AggregateResult, CategoryGroupTable, DEFAULT_GROUP_LABELS, Result, run_stage,
};
use mfreport_ingest::{ColumnLayout, SourceEncoding, to_utf8};
use tracing::info;

use crate::aggregator::CategoryAggregator;
use crate::extractor::extract;

/// Everything one invocation needs besides the raw bytes
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub encoding: SourceEncoding,
    pub layout: ColumnLayout,
    pub group_table: CategoryGroupTable,
    /// Output buckets, in output order
    pub category_list: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            encoding: SourceEncoding::ShiftJis,
            layout: ColumnLayout::default(),
            group_table: CategoryGroupTable::default(),
            category_list: DEFAULT_GROUP_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Run the whole pipeline over one export. All-or-nothing: any stage
/// failure aborts with that stage's error.
pub fn aggregate_export(bytes: &[u8], config: &PipelineConfig) -> Result<AggregateResult> {
    let aggregator = CategoryAggregator::new(&config.category_list)?;

    let text = run_stage("to_utf8", || to_utf8(bytes, config.encoding))?;
    let extracted = run_stage("extract", || extract(&text, &config.layout))?;
    let totals = run_stage("sum_by_category", || {
        aggregator.sum_by_category(&extracted.records, &config.group_table)
    })?;

    info!(
        month = %extracted.reporting_month,
        records = extracted.records.len(),
        total_yen = totals.grand_total(),
        "aggregated export"
    );

    Ok(AggregateResult {
        reporting_month: extracted.reporting_month,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfreport_core::PipelineError;

    fn utf8_config() -> PipelineConfig {
        PipelineConfig {
            encoding: SourceEncoding::Utf8,
            ..PipelineConfig::default()
        }
    }

    const HEADER: &str = "計算対象,日付,内容,金額（円）,保有金融機関,大項目,中項目,メモ,振替,ID\n";

    #[test]
    fn test_aggregate_utf8_export() {
        let text = format!(
            "{HEADER}\
             1,2024/06/01,家賃,-80000,銀行,住宅,1. 家賃,,0,a\n\
             1,2024/06/02,昼食,-900,カード,食費,2. 外食,,0,b\n\
             1,2024/06/03,返金,500,カード,食費,2. 外食,,0,c\n\
             0,2024/06/04,振替,-30000,銀行,未分類,4. 未分類,,1,d\n"
        );
        let result = aggregate_export(text.as_bytes(), &utf8_config()).unwrap();
        assert_eq!(result.reporting_month.to_string(), "2024-06");
        assert_eq!(result.totals.get("1. 定期・固定費"), Some(80000));
        assert_eq!(result.totals.get("2. 定期・変動費"), Some(900));
        assert_eq!(result.totals.get("3. 不定期・固定費"), Some(0));
        assert_eq!(result.totals.get("4. 不定期・変動費"), Some(0));
    }

    #[test]
    fn test_duplicate_category_list_fails_before_decoding() {
        let config = PipelineConfig {
            category_list: vec!["a".to_string(), "a".to_string()],
            ..utf8_config()
        };
        // Not valid UTF-8 either; the list is checked first.
        let err = aggregate_export(b"\xFF", &config).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidCategoryList(_)));
    }

    #[test]
    fn test_empty_export_is_empty_dataset() {
        let err = aggregate_export(HEADER.as_bytes(), &utf8_config()).unwrap_err();
        assert_eq!(err, PipelineError::EmptyDataset);
    }
}
