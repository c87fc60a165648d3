//! Export downloads
//!
//! Native stand-in for the browser's download navigation: fetch the export
//! endpoint and write the body into a directory.

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{ApiError, HttpApiClient};
use crate::model::ExportFormat;

/// A fetched export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub task_id: i64,
    pub format: ExportFormat,
    /// Name suggested by `Content-Disposition`
    pub filename: Option<String>,
    pub body: Vec<u8>,
}

impl ExportFile {
    /// File name to save under, never containing a directory component
    pub fn file_name(&self) -> String {
        self.filename
            .as_deref()
            .and_then(|name| Path::new(name).file_name())
            .map(|name| name.to_string_lossy().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("task_{}.{}", self.task_id, self.format.extension()))
    }
}

/// Errors while saving an export
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Extract the file name from a `Content-Disposition` header value
pub(crate) fn filename_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Download a task export into `dir`, returning the written path
pub async fn download_export(
    client: &HttpApiClient,
    task_id: i64,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let file = client.fetch_export(task_id, format).await?;
    save_export(&file, dir).await
}

/// Write an export file into `dir`
pub async fn save_export(file: &ExportFile, dir: &Path) -> Result<PathBuf, DownloadError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| DownloadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let path = dir.join(file.file_name());
    tokio::fs::write(&path, &file.body)
        .await
        .map_err(|source| DownloadError::Io {
            path: path.clone(),
            source,
        })?;

    tracing::info!(
        task_id = file.task_id,
        bytes = file.body.len(),
        "Saved {} export to {:?}",
        file.format.label(),
        path
    );

    Ok(path)
}
