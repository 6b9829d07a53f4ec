use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Character encodings an export may arrive in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SourceEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[default]
    #[serde(rename = "shift_jis")]
    ShiftJis,
}

impl SourceEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::ShiftJis => "Shift_JIS",
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(SourceEncoding::Utf8),
            "shift_jis" | "shift-jis" | "sjis" | "cp932" | "windows-31j" => {
                Ok(SourceEncoding::ShiftJis)
            }
            other => Err(format!("unsupported encoding: {}", other)),
        }
    }
}

/// A dynamically typed CSV cell
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Type a raw cell: empty, boolean literal, integer, float, else text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldValue::Empty;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return FieldValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return FieldValue::Bool(false);
        }
        // Numbers only when they print back identically, so IDs like "0012" stay text.
        if let Ok(n) = trimmed.parse::<i64>() {
            if n.to_string() == trimmed {
                return FieldValue::Integer(n);
            }
        }
        if let Ok(x) = trimmed.parse::<f64>() {
            if x.is_finite() && x.to_string() == trimmed {
                return FieldValue::Float(x);
            }
        }
        FieldValue::Text(raw.to_string())
    }

    /// Truthiness of a flag cell (`1`/`0`, booleans, anything else non-empty is true)
    pub fn truthy(&self) -> bool {
        match self {
            FieldValue::Empty => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Integer(n) => *n != 0,
            FieldValue::Float(x) => *x != 0.0,
            FieldValue::Text(s) => !s.is_empty(),
        }
    }

    /// Literal text of the cell, as it would be printed back out
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Float(x) => x.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

/// One data row keyed by header name
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// 1-based line the row started on
    pub line: u64,
    pub fields: HashMap<String, FieldValue>,
    /// Cell text exactly as it appeared in the file
    pub raw: HashMap<String, String>,
}

impl CsvRow {
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    pub fn raw(&self, column: &str) -> Option<&str> {
        self.raw.get(column).map(String::as_str)
    }
}

/// Header names for each column role of the export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub include_flag: String,
    pub date: String,
    pub description: String,
    pub institution: String,
    pub major_category: String,
    pub minor_category: String,
    pub memo: String,
    pub transfer_flag: String,
    pub id: String,
    pub amount: String,
}

impl ColumnLayout {
    /// The two columns coerced to booleans while parsing
    pub fn flag_columns(&self) -> [&str; 2] {
        [self.include_flag.as_str(), self.transfer_flag.as_str()]
    }

    /// Every column a record needs, in export order
    pub fn required_columns(&self) -> [&str; 10] {
        [
            self.include_flag.as_str(),
            self.date.as_str(),
            self.description.as_str(),
            self.institution.as_str(),
            self.major_category.as_str(),
            self.minor_category.as_str(),
            self.memo.as_str(),
            self.transfer_flag.as_str(),
            self.id.as_str(),
            self.amount.as_str(),
        ]
    }
}

impl Default for ColumnLayout {
    /// Headers of the MoneyForward ME household-account export.
    fn default() -> Self {
        Self {
            include_flag: "計算対象".to_string(),
            date: "日付".to_string(),
            description: "内容".to_string(),
            institution: "保有金融機関".to_string(),
            major_category: "大項目".to_string(),
            minor_category: "中項目".to_string(),
            memo: "メモ".to_string(),
            transfer_flag: "振替".to_string(),
            id: "ID".to_string(),
            amount: "金額（円）".to_string(),
        }
    }
}
