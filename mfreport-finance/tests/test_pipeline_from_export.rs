use encoding_rs::SHIFT_JIS;
use mfreport_core::{CategoryGroupTable, PipelineError};
use mfreport_finance::{PipelineConfig, aggregate_export};
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("moneyforward_2024_01.csv")
}

fn shift_jis(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
    assert!(!had_errors, "fixture text must be representable in Shift_JIS");
    bytes.into_owned()
}

fn four_group_config() -> PipelineConfig {
    let labels = ["1.A", "2.B", "3.C", "4.D"];
    PipelineConfig {
        group_table: CategoryGroupTable::from_labels(&labels).unwrap(),
        category_list: labels.iter().map(|s| s.to_string()).collect(),
        ..PipelineConfig::default()
    }
}

const HEADER: &str = "計算対象,日付,内容,金額（円）,保有金融機関,大項目,中項目,メモ,振替,ID";

fn export_with_amounts(amounts: &[i64]) -> String {
    let minors = ["1. サブスク", "2. コンビニ", "3. 年会費", "4. 旅行", "1. サブスク", "2. 交通費", "3. 年会費", "4. 家電"];
    let mut text = format!("{HEADER}\r\n");
    for (i, (amount, minor)) in amounts.iter().zip(minors.iter()).enumerate() {
        text.push_str(&format!(
            "1,2024/01/{:02},item{},{},カード,大項目,{},,0,id{}\r\n",
            i + 1,
            i,
            amount,
            minor,
            i
        ));
    }
    text
}

/// Real-export regression: Shift_JIS file on disk through the whole pipeline.
#[test]
fn test_fixture_export_totals() {
    let bytes = std::fs::read(fixture_path()).expect("fixture should exist");
    let result = aggregate_export(&bytes, &PipelineConfig::default()).unwrap();

    assert_eq!(result.reporting_month.to_string(), "2024-01");
    let totals: Vec<(&str, u64)> = result.totals.iter().collect();
    assert_eq!(
        totals,
        vec![
            ("1. 定期・固定費", 85990),
            ("2. 定期・変動費", 1968),
            ("3. 不定期・固定費", 11000),
            ("4. 不定期・変動費", 44600),
        ]
    );
}

#[test]
fn test_fixture_export_json_shape() {
    let bytes = std::fs::read(fixture_path()).unwrap();
    let result = aggregate_export(&bytes, &PipelineConfig::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["reportingMonth"], "2024-01");
    let keys: Vec<&String> = json["totals"].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 4);
    assert_eq!(json["totals"]["3. 不定期・固定費"], 11000);
}

#[test]
fn test_eight_expenditures_sum_per_group() {
    let bytes = shift_jis(&export_with_amounts(&[-100, -200, -300, -400, -500, -600, -700, -800]));
    let result = aggregate_export(&bytes, &four_group_config()).unwrap();

    let totals: Vec<(&str, u64)> = result.totals.iter().collect();
    assert_eq!(
        totals,
        vec![("1.A", 600), ("2.B", 800), ("3.C", 1000), ("4.D", 1200)]
    );
}

#[test]
fn test_income_row_is_left_out() {
    let bytes = shift_jis(&export_with_amounts(&[100, -200, -300, -400, -500, -600, -700, -800]));
    let result = aggregate_export(&bytes, &four_group_config()).unwrap();
    assert_eq!(result.totals.get("1.A"), Some(500));
    assert_eq!(result.totals.get("4.D"), Some(1200));
}

#[test]
fn test_shift_jis_bytes_read_as_utf8_fail_to_decode() {
    let bytes = std::fs::read(fixture_path()).unwrap();
    let config = PipelineConfig {
        encoding: mfreport_ingest::SourceEncoding::Utf8,
        ..PipelineConfig::default()
    };
    let err = aggregate_export(&bytes, &config).unwrap_err();
    assert!(matches!(err, PipelineError::Encoding { .. }), "got {:?}", err);
}

#[test]
fn test_unprefixed_expenditure_aborts_whole_run() {
    let mut text = export_with_amounts(&[-100, -200]);
    text.push_str("1,2024/01/09,謎,-50,カード,大項目,unknown expense,,0,idx\r\n");
    let err = aggregate_export(&shift_jis(&text), &four_group_config()).unwrap_err();
    assert_eq!(err, PipelineError::CategoryFormat("unknown expense".to_string()));
}

#[test]
fn test_group_missing_from_category_list() {
    let labels = ["1.A", "2.B", "3.C", "4.D"];
    let config = PipelineConfig {
        group_table: CategoryGroupTable::from_labels(&labels).unwrap(),
        category_list: vec!["1.A".to_string(), "2.B".to_string()],
        ..PipelineConfig::default()
    };
    let bytes = shift_jis(&export_with_amounts(&[-100, -200, -300]));
    let err = aggregate_export(&bytes, &config).unwrap_err();
    assert_eq!(err, PipelineError::CategoryNotConfigured("3.C".to_string()));
}

#[test]
fn test_structural_errors_reported_once() {
    let text = format!("{HEADER}\r\n1,2024/01/01,short\r\n1,2024/01/02,x,-1,c,m,1. a,,0,i\r\n1,2024/01/03,too,many,f,i,e,l,d,s,!\r\n");
    let err = aggregate_export(&shift_jis(&text), &four_group_config()).unwrap_err();
    match err {
        PipelineError::Parse(diagnostics) => {
            let lines: Vec<Option<u64>> = diagnostics.iter().map(|d| d.line).collect();
            assert_eq!(lines, vec![Some(2), Some(4)]);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}
