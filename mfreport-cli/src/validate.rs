//! Config validation: each item has an ordered list of named predicates and
//! is valid iff every predicate passes.

use std::fmt;

use mfreport_ingest::SourceEncoding;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigItem {
    CategoryList,
    Encoding,
    StorePath,
    InputPath,
}

impl ConfigItem {
    pub fn key(&self) -> &'static str {
        match self {
            ConfigItem::CategoryList => "report.category_list",
            ConfigItem::Encoding => "report.encoding",
            ConfigItem::StorePath => "output.store_path",
            ConfigItem::InputPath => "input.path",
        }
    }
}

type Predicate = fn(Option<&str>) -> bool;

fn not_empty(v: Option<&str>) -> bool {
    v.is_none_or(|s| !s.trim().is_empty())
}

fn comma_separated(v: Option<&str>) -> bool {
    v.is_some_and(|s| s.split(',').all(|label| !label.trim().is_empty()))
}

fn no_duplicate_labels(v: Option<&str>) -> bool {
    v.is_some_and(|s| {
        let labels: Vec<&str> = s.split(',').map(str::trim).collect();
        labels
            .iter()
            .enumerate()
            .all(|(i, label)| !labels[..i].contains(label))
    })
}

fn known_encoding(v: Option<&str>) -> bool {
    v.is_some_and(|s| s.parse::<SourceEncoding>().is_ok())
}

const RULES: &[(ConfigItem, &[(&str, Predicate)])] = &[
    (
        ConfigItem::CategoryList,
        &[
            ("not_empty", not_empty),
            ("comma_separated", comma_separated),
            ("no_duplicate_labels", no_duplicate_labels),
        ],
    ),
    (
        ConfigItem::Encoding,
        &[
            ("not_empty", not_empty),
            ("known_encoding", known_encoding),
        ],
    ),
    (ConfigItem::StorePath, &[("not_empty", not_empty)]),
    (ConfigItem::InputPath, &[("not_empty", not_empty)]),
];

/// A config item that failed one of its predicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub item: ConfigItem,
    pub rule: &'static str,
    pub value: Option<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{} failed {} (value: {:?})", self.item.key(), self.rule, v),
            None => write!(f, "{} failed {} (not set)", self.item.key(), self.rule),
        }
    }
}

/// First predicate of `item` that `value` fails, if any.
pub fn check_item(item: ConfigItem, value: Option<&str>) -> Option<&'static str> {
    RULES
        .iter()
        .filter(|(i, _)| *i == item)
        .flat_map(|(_, preds)| preds.iter())
        .find(|(_, pred)| !pred(value))
        .map(|(name, _)| *name)
}

fn item_value(cfg: &Config, item: ConfigItem) -> Option<&str> {
    match item {
        ConfigItem::CategoryList => Some(cfg.report.category_list.as_str()),
        ConfigItem::Encoding => Some(cfg.report.encoding.as_str()),
        ConfigItem::StorePath => cfg.output.store_path.as_deref(),
        ConfigItem::InputPath => cfg.input.path.as_deref(),
    }
}

/// Every violation across the config, in rule-table order.
pub fn validate_config(cfg: &Config) -> Vec<Violation> {
    RULES
        .iter()
        .filter_map(|(item, _)| {
            let value = item_value(cfg, *item);
            check_item(*item, value).map(|rule| Violation {
                item: *item,
                rule,
                value: value.map(str::to_string),
            })
        })
        .collect()
}
