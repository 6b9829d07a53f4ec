//! Category groups and the digit-to-label table

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// The four spending groups, selected by the digit prefix of a minor category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryGroup {
    #[serde(rename = "periodic-fixed")]
    PeriodicFixed,
    #[serde(rename = "periodic-variable")]
    PeriodicVariable,
    #[serde(rename = "non-periodic-fixed")]
    NonPeriodicFixed,
    #[serde(rename = "non-periodic-variable")]
    NonPeriodicVariable,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 4] = [
        CategoryGroup::PeriodicFixed,
        CategoryGroup::PeriodicVariable,
        CategoryGroup::NonPeriodicFixed,
        CategoryGroup::NonPeriodicVariable,
    ];

    /// Map a prefix digit to its group. Only `'1'`..=`'4'` are groups.
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(CategoryGroup::PeriodicFixed),
            '2' => Some(CategoryGroup::PeriodicVariable),
            '3' => Some(CategoryGroup::NonPeriodicFixed),
            '4' => Some(CategoryGroup::NonPeriodicVariable),
            _ => None,
        }
    }

    pub fn digit(&self) -> char {
        match self {
            CategoryGroup::PeriodicFixed => '1',
            CategoryGroup::PeriodicVariable => '2',
            CategoryGroup::NonPeriodicFixed => '3',
            CategoryGroup::NonPeriodicVariable => '4',
        }
    }

    fn slot(&self) -> usize {
        match self {
            CategoryGroup::PeriodicFixed => 0,
            CategoryGroup::PeriodicVariable => 1,
            CategoryGroup::NonPeriodicFixed => 2,
            CategoryGroup::NonPeriodicVariable => 3,
        }
    }
}

/// Labels used by the household-account book the exports come from.
pub const DEFAULT_GROUP_LABELS: [&str; 4] = [
    "1. 定期・固定費",
    "2. 定期・変動費",
    "3. 不定期・固定費",
    "4. 不定期・変動費",
];

/// Display label for each of the four groups, in digit order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroupTable {
    labels: [String; 4],
}

impl CategoryGroupTable {
    pub fn new(labels: [String; 4]) -> Self {
        Self { labels }
    }

    /// Build a table from a configured list; it must hold exactly one label per group.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let labels: [String; 4] = labels
            .iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|v: Vec<String>| {
                PipelineError::InvalidCategoryList(format!(
                    "expected 4 group labels, got {}",
                    v.len()
                ))
            })?;
        Ok(Self { labels })
    }

    pub fn label(&self, group: CategoryGroup) -> &str {
        &self.labels[group.slot()]
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for CategoryGroupTable {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_LABELS.map(String::from))
    }
}
