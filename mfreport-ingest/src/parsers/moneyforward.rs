//! MoneyForward ME household-account export → `ExpenseRecord`s
//!
//! Expected header (Shift_JIS in the wild, decoded before it gets here):
//!   計算対象,日付,内容,金額（円）,保有金融機関,大項目,中項目,メモ,振替,ID
//!
//! Header names are configurable through [`ColumnLayout`]; the order of the
//! columns in the file is not significant.

use mfreport_core::{ExpenseRecord, PipelineError, Result, RowDiagnostic};
use tracing::debug;

use crate::parsers::csv_rows::{ParsedCsv, parse_rows};
use crate::types::{ColumnLayout, CsvRow, FieldValue};

// Text fields take the cell verbatim; typing would drop padding and leading zeros.
fn text(row: &CsvRow, column: &str) -> String {
    row.raw(column).map(str::to_string).unwrap_or_default()
}

fn flag(row: &CsvRow, column: &str) -> bool {
    row.get(column).map(FieldValue::truthy).unwrap_or(false)
}

fn amount(row: &CsvRow, column: &str) -> std::result::Result<i64, RowDiagnostic> {
    match row.get(column) {
        Some(FieldValue::Integer(n)) => Ok(*n),
        Some(other) => Err(RowDiagnostic::at_line(
            row.line,
            format!("{} is not an integer yen amount: {:?}", column, other.as_text()),
        )),
        None => Err(RowDiagnostic::at_line(row.line, format!("missing {}", column))),
    }
}

fn to_record(row: &CsvRow, layout: &ColumnLayout) -> std::result::Result<ExpenseRecord, RowDiagnostic> {
    Ok(ExpenseRecord {
        include_in_calculation: flag(row, &layout.include_flag),
        transfer: flag(row, &layout.transfer_flag),
        date: text(row, &layout.date),
        description: text(row, &layout.description),
        institution: text(row, &layout.institution),
        major_category: text(row, &layout.major_category),
        minor_category: text(row, &layout.minor_category),
        memo: text(row, &layout.memo),
        id: text(row, &layout.id),
        amount_yen: amount(row, &layout.amount)?,
    })
}

/// Map already-parsed rows to records, collecting every problem.
pub fn records_from_rows(parsed: &ParsedCsv, layout: &ColumnLayout) -> Result<Vec<ExpenseRecord>> {
    let mut diagnostics = Vec::new();

    // A header-less (empty) export has nothing to check; emptiness is judged downstream.
    if !parsed.headers.is_empty() {
        for column in layout.required_columns() {
            if !parsed.has_column(column) {
                diagnostics.push(RowDiagnostic::whole_file(format!("missing column: {}", column)));
            }
        }
    }
    if !diagnostics.is_empty() {
        return Err(PipelineError::Parse(diagnostics));
    }

    let mut records = Vec::with_capacity(parsed.rows.len());
    for row in &parsed.rows {
        match to_record(row, layout) {
            Ok(record) => records.push(record),
            Err(d) => diagnostics.push(d),
        }
    }

    if !diagnostics.is_empty() {
        return Err(PipelineError::Parse(diagnostics));
    }

    debug!(records = records.len(), "mapped export rows to expense records");
    Ok(records)
}

/// Parse export text straight into records.
pub fn parse_export_text(text: &str, layout: &ColumnLayout) -> Result<Vec<ExpenseRecord>> {
    let parsed = parse_rows(text, &layout.flag_columns())?;
    records_from_rows(&parsed, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "計算対象,日付,内容,金額（円）,保有金融機関,大項目,中項目,メモ,振替,ID";

    fn export(rows: &[&str]) -> String {
        let mut s = String::from(HEADER);
        s.push('\n');
        for r in rows {
            s.push_str(r);
            s.push('\n');
        }
        s
    }

    #[test]
    fn test_parse_export_rows() {
        let text = export(&[
            "1,2024/01/05,動画配信,-980,楽天カード,教養・教育,1. サブスク,,0,abc123",
            "0,2024/01/25,給与,250000,みずほ銀行,収入,給与,,0,def456",
        ]);
        let records = parse_export_text(&text, &ColumnLayout::default()).unwrap();

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert!(first.include_in_calculation);
        assert!(!first.transfer);
        assert_eq!(first.date, "2024/01/05");
        assert_eq!(first.description, "動画配信");
        assert_eq!(first.institution, "楽天カード");
        assert_eq!(first.minor_category, "1. サブスク");
        assert_eq!(first.memo, "");
        assert_eq!(first.id, "abc123");
        assert_eq!(first.amount_yen, -980);

        assert!(!records[1].include_in_calculation);
        assert_eq!(records[1].amount_yen, 250000);
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let text = "計算対象,日付,内容\n1,2024/01/05,x\n";
        let err = parse_export_text(text, &ColumnLayout::default()).unwrap_err();
        match err {
            PipelineError::Parse(diagnostics) => {
                assert_eq!(diagnostics.len(), 7);
                assert!(diagnostics.iter().all(|d| d.line.is_none()));
                assert!(diagnostics.iter().any(|d| d.message == "missing column: ID"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_amounts_collected_per_row() {
        let text = export(&[
            "1,2024/01/05,a,-abc,x,y,1. z,,0,1",
            "1,2024/01/05,b,-100,x,y,1. z,,0,2",
            "1,2024/01/05,c,,x,y,1. z,,0,3",
        ]);
        let err = parse_export_text(&text, &ColumnLayout::default()).unwrap_err();
        match err {
            PipelineError::Parse(diagnostics) => {
                assert_eq!(diagnostics.len(), 2);
                assert_eq!(diagnostics[0].line, Some(2));
                assert_eq!(diagnostics[1].line, Some(4));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_text_columns_keep_literal_cells() {
        let text = export(&["1,2024/01/05, 12 ,-500,x,y,1. z,  memo ,0,0012"]);
        let records = parse_export_text(&text, &ColumnLayout::default()).unwrap();
        assert_eq!(records[0].description, " 12 ");
        assert_eq!(records[0].memo, "  memo ");
        assert_eq!(records[0].id, "0012");
        assert_eq!(records[0].amount_yen, -500);
    }

    #[test]
    fn test_empty_text_yields_no_records() {
        let records = parse_export_text("", &ColumnLayout::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_header_only_yields_no_records() {
        let records = parse_export_text(&export(&[]), &ColumnLayout::default()).unwrap();
        assert!(records.is_empty());
    }
}
