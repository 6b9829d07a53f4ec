//! Result sinks: where an `AggregateResult` goes once computed.

use anyhow::{Context, Result, bail};
use mfreport_core::AggregateResult;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub trait ResultSink {
    fn name(&self) -> &'static str;
    fn accept(&mut self, result: &AggregateResult) -> Result<()>;
}

/// Pretty JSON to a writer (stdout in the binary)
pub struct StdoutSink<W: Write> {
    out: W,
}

impl<W: Write> StdoutSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ResultSink for StdoutSink<W> {
    fn name(&self) -> &'static str {
        "stdout"
    }

    fn accept(&mut self, result: &AggregateResult) -> Result<()> {
        let json = serde_json::to_string_pretty(result).context("serialize result")?;
        writeln!(self.out, "{}", json)?;
        Ok(())
    }
}

/// JSON object file keyed by reporting month. Re-running a month
/// overwrites that month's totals; other months are kept.
pub struct JsonStoreSink {
    path: PathBuf,
}

impl JsonStoreSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_store(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        match serde_json::from_str::<Value>(&s).with_context(|| format!("parse {}", self.path.display()))? {
            Value::Object(map) => Ok(map),
            _ => bail!("{} is not a JSON object", self.path.display()),
        }
    }

    /// Months held in the store, oldest first
    pub fn months(&self) -> Result<Vec<String>> {
        let mut months: Vec<String> = self.read_store()?.keys().cloned().collect();
        months.sort();
        Ok(months)
    }

    pub fn totals_for(&self, month: &str) -> Result<Option<Value>> {
        Ok(self.read_store()?.remove(month))
    }
}

impl ResultSink for JsonStoreSink {
    fn name(&self) -> &'static str {
        "json-store"
    }

    fn accept(&mut self, result: &AggregateResult) -> Result<()> {
        let mut store = self.read_store()?;
        let totals = serde_json::to_value(&result.totals).context("serialize totals")?;
        store.insert(result.reporting_month.to_string(), totals);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        let s = serde_json::to_string_pretty(&Value::Object(store)).context("serialize store")?;
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        tracing::info!(month = %result.reporting_month, path = %self.path.display(), "stored totals");
        Ok(())
    }
}
