use anyhow::{Context, Result};
use mfreport_core::{CategoryGroupTable, DEFAULT_GROUP_LABELS};
use mfreport_finance::PipelineConfig;
use mfreport_ingest::{ColumnLayout, SourceEncoding};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_mfreport_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub input: InputSection,
    pub report: ReportSection,
    pub columns: ColumnLayout,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputSection {
    /// Export file, or a directory whose newest `*.csv` is used
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSection {
    /// "shift_jis" or "utf-8"
    pub encoding: String,
    /// Comma-separated output buckets, in output order
    pub category_list: String,
    /// Label for group digits 1..=4
    pub group_labels: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSection {
    /// Month-keyed JSON store; defaults to ~/.mfreport/months.json
    pub store_path: Option<String>,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            encoding: "shift_jis".to_string(),
            category_list: DEFAULT_GROUP_LABELS.join(","),
            group_labels: DEFAULT_GROUP_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Labels of the comma-separated category list, trimmed
    pub fn category_labels(&self) -> Vec<String> {
        split_category_list(&self.report.category_list)
    }

    /// Build the pipeline's view of this config. Run `validate_config` first.
    pub fn to_pipeline_config(&self) -> Result<PipelineConfig> {
        let encoding: SourceEncoding = self
            .report
            .encoding
            .parse()
            .map_err(anyhow::Error::msg)?;
        let group_table = CategoryGroupTable::from_labels(&self.report.group_labels)
            .context("report.group_labels")?;

        Ok(PipelineConfig {
            encoding,
            layout: self.columns.clone(),
            group_table,
            category_list: self.category_labels(),
        })
    }
}

pub fn split_category_list(list: &str) -> Vec<String> {
    list.split(',').map(|s| s.trim().to_string()).collect()
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_mfreport_home()?.join("config.toml"))
}

/// Load `path`, or the default config file; a missing file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
