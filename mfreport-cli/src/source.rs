//! Where export bytes come from. Reading them is the only I/O the
//! aggregation run waits on.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSource {
    /// One export file
    File(PathBuf),
    /// The most recently modified `*.csv` in a drop directory
    LatestInDir(PathBuf),
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

impl ExportSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            ExportSource::LatestInDir(path)
        } else {
            ExportSource::File(path)
        }
    }

    /// Resolve the export to read and return its path and raw bytes.
    pub async fn fetch_latest_export(&self) -> Result<(PathBuf, Vec<u8>)> {
        let path = match self {
            ExportSource::File(p) => p.clone(),
            ExportSource::LatestInDir(dir) => latest_csv(dir).await?,
        };
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("read {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "fetched export");
        Ok((path, bytes))
    }
}

async fn latest_csv(dir: &Path) -> Result<PathBuf> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("list {}", dir.display()))?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_csv(&path) {
            continue;
        }
        let meta = entry.metadata().await?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        // Ties go to the lexically later name so the choice is stable.
        let newer = match &latest {
            None => true,
            Some((t, p)) => (modified, &path) > (*t, p),
        };
        if newer {
            latest = Some((modified, path));
        }
    }

    match latest {
        Some((_, path)) => Ok(path),
        None => bail!("no CSV exports found in {}", dir.display()),
    }
}
