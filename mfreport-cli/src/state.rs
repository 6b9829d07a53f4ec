use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn mfreport_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".mfreport"))
}

pub fn ensure_mfreport_home() -> Result<PathBuf> {
    let dir = mfreport_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Default location of the month-keyed result store.
pub fn default_store_path() -> Result<PathBuf> {
    Ok(ensure_mfreport_home()?.join("months.json"))
}
