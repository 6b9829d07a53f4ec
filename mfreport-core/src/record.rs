//! Expense record type for one row of the monthly export

use serde::{Deserialize, Serialize};

/// One transaction row from the household-account export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseRecord {
    /// Whether the row counts toward aggregation
    pub include_in_calculation: bool,
    /// Inter-account transfer marker (carried, not aggregated on)
    pub transfer: bool,
    /// Transaction date as exported (YYYY/MM/DD)
    pub date: String,
    /// Human-readable description
    pub description: String,
    /// Bank/card the transaction came from
    pub institution: String,
    /// Free-text major category
    pub major_category: String,
    /// Minor category, prefixed with its group digit (e.g. "1. サブスク")
    pub minor_category: String,
    pub memo: String,
    pub id: String,
    /// Negative = expenditure, positive = income/refund
    pub amount_yen: i64,
}

impl ExpenseRecord {
    /// Create an included, non-transfer record with the fields aggregation looks at.
    /// Remaining text fields start empty.
    pub fn new(date: impl Into<String>, minor_category: impl Into<String>, amount_yen: i64) -> Self {
        Self {
            include_in_calculation: true,
            transfer: false,
            date: date.into(),
            description: String::new(),
            institution: String::new(),
            major_category: String::new(),
            minor_category: minor_category.into(),
            memo: String::new(),
            id: String::new(),
            amount_yen,
        }
    }

    pub fn with_included(mut self, included: bool) -> Self {
        self.include_in_calculation = included;
        self
    }

    pub fn with_transfer(mut self, transfer: bool) -> Self {
        self.transfer = transfer;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns true if this is an expenditure (negative amount)
    pub fn is_expenditure(&self) -> bool {
        self.amount_yen < 0
    }

    /// Returns true if this row contributes to category totals
    pub fn counts_toward_totals(&self) -> bool {
        self.include_in_calculation && self.is_expenditure()
    }
}
