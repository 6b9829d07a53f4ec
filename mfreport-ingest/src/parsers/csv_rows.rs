//! Header-driven CSV parsing into typed field maps.
//!
//! The header row names every field; data rows are keyed by those names, so
//! column order in the file does not matter. Structural problems do not stop
//! the pass: they are collected and reported together once the whole input
//! has been read.

use std::collections::{HashMap, HashSet};

use mfreport_core::{PipelineError, Result, RowDiagnostic};
use tracing::debug;

use crate::types::{CsvRow, FieldValue};

/// Header names plus data rows, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl ParsedCsv {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty()) && record.len() <= 1
}

/// Parse UTF-8 CSV text. Columns named in `flag_columns` are coerced to
/// `FieldValue::Bool`; every other cell keeps its inferred literal type.
pub fn parse_rows(text: &str, flag_columns: &[&str]) -> Result<ParsedCsv> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let mut diagnostics = Vec::new();

    let headers: Vec<String> = match rdr.headers() {
        Ok(h) => h.iter().map(|name| name.trim().to_string()).collect(),
        Err(e) => {
            return Err(PipelineError::Parse(vec![RowDiagnostic::at_line(
                1,
                format!("unreadable header row: {}", e),
            )]));
        }
    };

    let mut seen = HashSet::new();
    for name in &headers {
        if !seen.insert(name.as_str()) {
            diagnostics.push(RowDiagnostic::at_line(1, format!("duplicate column: {}", name)));
        }
    }

    let flags: HashSet<&str> = flag_columns.iter().copied().collect();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                diagnostics.push(RowDiagnostic::at_line(line, e.to_string()));
                continue;
            }
        };

        if is_blank(&record) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != headers.len() {
            diagnostics.push(RowDiagnostic::at_line(
                line,
                format!("expected {} fields, found {}", headers.len(), record.len()),
            ));
            continue;
        }

        let mut fields = HashMap::with_capacity(headers.len());
        let mut raw_cells = HashMap::with_capacity(headers.len());
        for (name, raw) in headers.iter().zip(record.iter()) {
            let value = FieldValue::infer(raw);
            let value = if flags.contains(name.as_str()) {
                FieldValue::Bool(value.truthy())
            } else {
                value
            };
            fields.insert(name.clone(), value);
            raw_cells.insert(name.clone(), raw.to_string());
        }

        rows.push(CsvRow {
            line,
            fields,
            raw: raw_cells,
        });
    }

    if !diagnostics.is_empty() {
        return Err(PipelineError::Parse(diagnostics));
    }

    debug!(columns = headers.len(), rows = rows.len(), "parsed CSV rows");
    Ok(ParsedCsv { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAGS: [&str; 2] = ["included", "transfer"];

    #[test]
    fn test_parse_basic_rows_in_order() {
        let text = "included,date,amount,transfer\n1,2024/01/05,-500,0\n0,2024/01/06,1200,1\n";
        let parsed = parse_rows(text, &FLAGS).unwrap();

        assert_eq!(parsed.headers, vec!["included", "date", "amount", "transfer"]);
        assert_eq!(parsed.rows.len(), 2);

        let first = &parsed.rows[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.get("included"), Some(&FieldValue::Bool(true)));
        assert_eq!(first.get("transfer"), Some(&FieldValue::Bool(false)));
        assert_eq!(first.get("amount"), Some(&FieldValue::Integer(-500)));
        assert_eq!(first.get("date"), Some(&FieldValue::Text("2024/01/05".to_string())));

        let second = &parsed.rows[1];
        assert_eq!(second.get("included"), Some(&FieldValue::Bool(false)));
        assert_eq!(second.get("transfer"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let a = parse_rows("included,amount\n1,-10\n", &FLAGS).unwrap();
        let b = parse_rows("amount,included\n-10,1\n", &FLAGS).unwrap();
        assert_eq!(a.rows[0].fields, b.rows[0].fields);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "included,amount\n\n1,-10\n\n\n0,20\n\n";
        let parsed = parse_rows(text, &FLAGS).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].get("amount"), Some(&FieldValue::Integer(20)));
    }

    #[test]
    fn test_boolean_literals_in_flag_columns() {
        let parsed = parse_rows("included,transfer\ntrue,FALSE\n", &FLAGS).unwrap();
        assert_eq!(parsed.rows[0].get("included"), Some(&FieldValue::Bool(true)));
        assert_eq!(parsed.rows[0].get("transfer"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let text = "included,memo,amount\n1,\"rent, March\",-80000\n";
        let parsed = parse_rows(text, &FLAGS).unwrap();
        assert_eq!(
            parsed.rows[0].get("memo"),
            Some(&FieldValue::Text("rent, March".to_string()))
        );
    }

    #[test]
    fn test_raw_cells_are_kept_untrimmed() {
        let text = "included,memo,amount
1, 42 , -80000
";
        let parsed = parse_rows(text, &FLAGS).unwrap();
        let row = &parsed.rows[0];
        assert_eq!(row.get("memo"), Some(&FieldValue::Integer(42)));
        assert_eq!(row.raw("memo"), Some(" 42 "));
        assert_eq!(row.get("amount"), Some(&FieldValue::Integer(-80000)));
    }

    #[test]
    fn test_header_only_is_empty_success() {
        let parsed = parse_rows("included,amount\n", &FLAGS).unwrap();
        assert!(parsed.rows.is_empty());
        assert!(parsed.has_column("amount"));
    }

    #[test]
    fn test_errors_are_collected_over_whole_input() {
        let text = "included,date,amount\n1,2024/01/05\n1,2024/01/06,-10\n1,2024/01/07,-20,extra\n";
        let err = parse_rows(text, &FLAGS).unwrap_err();
        match err {
            PipelineError::Parse(diagnostics) => {
                assert_eq!(diagnostics.len(), 2);
                assert_eq!(diagnostics[0].line, Some(2));
                assert_eq!(diagnostics[0].message, "expected 3 fields, found 2");
                assert_eq!(diagnostics[1].line, Some(4));
                assert_eq!(diagnostics[1].message, "expected 3 fields, found 4");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_header_is_reported() {
        let err = parse_rows("amount,amount\n1,2\n", &FLAGS).unwrap_err();
        assert_eq!(
            err,
            PipelineError::Parse(vec![RowDiagnostic::at_line(1, "duplicate column: amount")])
        );
    }
}
