//! Error taxonomy shared by every pipeline stage.

use std::fmt;

use thiserror::Error;

/// One structural problem found while parsing the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    /// 1-based line number in the CSV text (the header is line 1).
    /// `None` for problems that concern the file as a whole.
    pub line: Option<u64>,
    pub message: String,
}

impl RowDiagnostic {
    pub fn at_line(line: u64, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }

    pub fn whole_file(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// All errors produced by the aggregation pipeline.
///
/// Every stage surfaces one of these kinds unchanged; there is no partial
/// result and no recovery inside the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The byte buffer holds a sequence that is invalid for the declared encoding.
    #[error("Invalid {encoding} byte sequence at offset {offset}")]
    Encoding { encoding: String, offset: usize },

    /// One or more structural CSV problems, collected over the whole input.
    #[error("{}", format_diagnostics(.0))]
    Parse(Vec<RowDiagnostic>),

    /// A minor-category value has no leading `1`-`4` group digit.
    #[error("Invalid category format: {0}")]
    CategoryFormat(String),

    /// A representative record was required but the dataset has no rows.
    #[error("Expense data is empty")]
    EmptyDataset,

    /// The representative record's date does not look like `YYYY/MM/DD`.
    #[error("Invalid date format: {0}")]
    DateFormat(String),

    /// A derived category label is not among the configured labels.
    #[error("Category is not configured: {0}")]
    CategoryNotConfigured(String),

    /// The configured category list cannot key a totals table.
    #[error("Invalid category list: {0}")]
    InvalidCategoryList(String),
}

fn format_diagnostics(diagnostics: &[RowDiagnostic]) -> String {
    let lines: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
    format!(
        "{} error(s) while parsing CSV: {}",
        diagnostics.len(),
        lines.join("; ")
    )
}

/// Convenience alias used throughout the mfreport crates.
pub type Result<T> = std::result::Result<T, PipelineError>;
