use crate::errors::{AppError, AppResult};
use crate::utils::{format_bytes, format_duration};
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Returns true if the content type announces a binary archive.
fn is_archive_content_type(content_type: &str) -> bool {
    content_type.contains("zip") || content_type.contains("octet")
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Writes a download response to `path` and returns the number of bytes written.
///
/// # Behavior
///
/// - **Content check**: Responses whose `Content-Type` mentions neither `zip`
///   nor `octet` are rejected and their body is returned in the error, since the
///   site answers with an HTML page when the session or form is not accepted.
/// - **Atomic write**: The body is streamed to `<path>.part` and renamed when
///   complete, so an interrupted download never leaves a truncated archive.
/// - **Archive check**: The temp file must open as a ZIP archive before it
///   replaces `path`, so a bad download never clobbers an earlier archive.
///   The temp file is removed on every failure.
///
/// # Errors
///
/// Returns `NetworkError` for error statuses or broken streams,
/// `UnexpectedResponse` for non-archive content, `IoError` for file system
/// failures and `ArchiveError` if the downloaded file is not a readable archive.
pub async fn save_response(mut response: Response, path: &Path) -> AppResult<u64> {
    let started = Instant::now();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    debug!(status = status.as_u16(), content_type = %content_type, "Response received");

    if !status.is_success() {
        return Err(AppError::NetworkError(format!(
            "HTTP {}: download of {} failed",
            status.as_u16(),
            path.display()
        )));
    }

    if !is_archive_content_type(&content_type) {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::UnexpectedResponse { content_type, body });
    }

    let tmp_path = part_path(path);
    let result = write_part_file(&mut response, &tmp_path).await;
    let written = match result {
        Ok(written) => written,
        Err(e) => {
            remove_part_file(&tmp_path).await;
            return Err(e);
        }
    };

    if let Err(e) = verify_archive_blocking(tmp_path.clone()).await {
        remove_part_file(&tmp_path).await;
        return Err(e);
    }

    fs::rename(&tmp_path, path).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to rename temp file {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        ))
    })?;

    info!(
        file_path = %path.display(),
        size = %format_bytes(written),
        elapsed = %format_duration(started.elapsed()),
        "Download completed"
    );
    Ok(written)
}

/// Streams the response body into `tmp_path` and returns the bytes written.
async fn write_part_file(response: &mut Response, tmp_path: &Path) -> AppResult<u64> {
    let mut file = File::create(tmp_path).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to create output file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;

    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await.map_err(|e| {
            AppError::IoError(format!(
                "Failed to write to temp file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Best-effort removal of an abandoned temp file.
async fn remove_part_file(tmp_path: &Path) {
    if let Err(e) = fs::remove_file(tmp_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(
                file_path = %tmp_path.display(),
                error = %e,
                "Failed to remove temp file"
            );
        }
    }
}

async fn verify_archive_blocking(path: PathBuf) -> AppResult<usize> {
    tokio::task::spawn_blocking(move || verify_archive(&path))
        .await
        .map_err(|e| AppError::IoError(format!("Archive check task failed: {e}")))?
}

/// Opens `path` as a ZIP archive and returns its number of entries.
pub fn verify_archive(path: &Path) -> AppResult<usize> {
    let file = std::fs::File::open(path).map_err(|e| {
        AppError::IoError(format!("Failed to open archive {}: {}", path.display(), e))
    })?;
    let archive = ZipArchive::new(file).map_err(|e| {
        AppError::ArchiveError(format!("{} is not a valid zip file: {e}", path.display()))
    })?;
    debug!(file_path = %path.display(), entries = archive.len(), "Archive verified");
    Ok(archive.len())
}
