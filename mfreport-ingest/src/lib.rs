//! mfreport-ingest: export decoding (Shift_JIS/UTF-8) and header-driven CSV parsing.

pub mod encoding;
pub mod parsers;
pub mod types;

pub use encoding::to_utf8;
pub use parsers::{ParsedCsv, parse_export_text, parse_rows, records_from_rows};
pub use types::{ColumnLayout, CsvRow, FieldValue, SourceEncoding};
