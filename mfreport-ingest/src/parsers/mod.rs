//! Export parsers: generic header-keyed CSV rows, and the MoneyForward layout on top.

pub mod csv_rows;
pub mod moneyforward;

pub use csv_rows::{ParsedCsv, parse_rows};
pub use moneyforward::{parse_export_text, records_from_rows};
