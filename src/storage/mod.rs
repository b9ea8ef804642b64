//! Flat-file storage
//!
//! Three directories act as the only persistence:
//! - working uploads (`{token}_{name}`), removed only when extraction fails
//! - public archive of originals, same names, never removed here
//! - rendered outputs (`simplified_{token}_{stem}.{ext}`)
//!
//! Every name carries a fresh per-request token, so requests never write the
//! same path and no locking is needed.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::render::OutputFormat;
use crate::types::{AppError, AppResult};
use crate::utils::is_safe_lookup_name;

/// Paths of a freshly stored upload
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub stored_name: String,
    pub working_path: PathBuf,
    pub archive_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    upload_dir: PathBuf,
    output_dir: PathBuf,
    originals_dir: PathBuf,
}

pub fn stored_upload_name(token: &str, sanitized_name: &str) -> String {
    format!("{}_{}", token, sanitized_name)
}

pub fn output_filename(token: &str, stem: &str, format: OutputFormat) -> String {
    format!("simplified_{}_{}.{}", token, stem, format.extension())
}

impl DocumentStore {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        originals_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
            originals_dir: originals_dir.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            config.upload_dir.clone(),
            config.output_dir.clone(),
            config.originals_dir.clone(),
        )
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn originals_dir(&self) -> &Path {
        &self.originals_dir
    }

    /// Create all three directories if missing
    pub async fn ensure_dirs(&self) -> AppResult<()> {
        for dir in [&self.upload_dir, &self.output_dir, &self.originals_dir] {
            fs::create_dir_all(dir).await?;
            debug!(path = %dir.display(), "Storage directory ready");
        }
        Ok(())
    }

    /// Write the working copy, then duplicate it into the archive
    pub async fn store_upload(&self, stored_name: &str, data: &[u8]) -> AppResult<StoredUpload> {
        let working_path = self.upload_dir.join(stored_name);
        let archive_path = self.originals_dir.join(stored_name);

        fs::write(&working_path, data).await?;
        fs::copy(&working_path, &archive_path).await?;

        info!(
            stored_name,
            size = data.len(),
            archive = %archive_path.display(),
            "Stored upload and archived original"
        );

        Ok(StoredUpload {
            stored_name: stored_name.to_string(),
            working_path,
            archive_path,
        })
    }

    /// Drop the working copy; the archived original stays
    pub async fn remove_working(&self, upload: &StoredUpload) {
        if let Err(e) = fs::remove_file(&upload.working_path).await {
            warn!(path = %upload.working_path.display(), error = %e, "Failed to remove working copy");
        }
    }

    pub async fn write_output(&self, filename: &str, data: &[u8]) -> AppResult<PathBuf> {
        let path = self.output_dir.join(filename);
        fs::write(&path, data).await?;
        Ok(path)
    }

    pub async fn read_output(&self, filename: &str) -> AppResult<Vec<u8>> {
        Self::read_from(&self.output_dir, filename).await
    }

    pub async fn read_original(&self, filename: &str) -> AppResult<Vec<u8>> {
        Self::read_from(&self.originals_dir, filename).await
    }

    async fn read_from(dir: &Path, filename: &str) -> AppResult<Vec<u8>> {
        if !is_safe_lookup_name(filename) {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        match fs::read(dir.join(filename)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
