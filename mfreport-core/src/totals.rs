//! Aggregation output: reporting month plus per-category totals

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// The `YYYY-MM` period an aggregate represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportingMonth {
    year: i32,
    month: u32,
}

impl ReportingMonth {
    /// Taken as written in the export; the month is not range-checked.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for ReportingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for ReportingMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Absolute yen spend per configured label, in configuration order.
///
/// The label set is exactly the configured list; serializes as a JSON
/// object whose keys keep that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryTotals {
    entries: Vec<(String, u64)>,
}

impl CategoryTotals {
    pub fn from_ordered(entries: Vec<(String, u64)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, amount)| *amount)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(l, a)| (l.as_str(), *a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over every category
    pub fn grand_total(&self) -> u64 {
        self.entries.iter().map(|(_, a)| a).sum()
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, amount) in &self.entries {
            map.serialize_entry(label, amount)?;
        }
        map.end()
    }
}

/// One invocation's output, handed to the result sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub reporting_month: ReportingMonth,
    pub totals: CategoryTotals,
}
