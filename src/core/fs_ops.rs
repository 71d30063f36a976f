// src/core/fs_ops.rs
//! Per-company log files

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::formatter::format_section;
use crate::types::ApplicationRecord;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    /// `<output_dir>/<company>.txt`
    pub fn company_log_path(output_dir: &Path, company: &str) -> PathBuf {
        output_dir.join(format!("{}.txt", company))
    }

    /// Append a timestamped section for `company`, stamped with the current UTC time
    pub async fn append_applications(
        output_dir: &Path,
        company: &str,
        records: &[ApplicationRecord],
    ) -> Result<PathBuf> {
        Self::append_applications_at(output_dir, company, Utc::now(), records).await
    }

    /// Append a section stamped with `at`. The file is created if needed and
    /// never truncated; the section goes out in a single write.
    pub async fn append_applications_at(
        output_dir: &Path,
        company: &str,
        at: DateTime<Utc>,
        records: &[ApplicationRecord],
    ) -> Result<PathBuf> {
        Self::ensure_dir_exists(output_dir).await?;

        let path = Self::company_log_path(output_dir, company);
        let section = format_section(at, records);

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        file.write_all(section.as_bytes())
            .await
            .with_context(|| format!("Failed to append to log file: {}", path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("Failed to flush log file: {}", path.display()))?;

        debug!("Appended {} records to {}", records.len(), path.display());
        Ok(path)
    }
}
