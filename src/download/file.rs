use std::path::Path;
use std::time::Instant;

use futures_util::TryStreamExt;
use reqwest::header::RANGE;
use reqwest::StatusCode;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;

use super::error::TransferError;
use super::format::format_size;
use super::progress::{FileProgress, ThroughputSampler};
use super::{Downloader, FolderContext};
use crate::retry::{self, RetryAction};

/// Bytes read from the response body per write.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Length of the existing local file, or 0 when there is none.
async fn existing_len(path: &Path) -> Result<u64, TransferError> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        Ok(_) => Ok(0),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}

impl Downloader<'_> {
    /// Download one file to `local_path`, resuming from whatever is already
    /// on disk.
    ///
    /// Returns `cumulative` plus the file's declared size on success (also
    /// when the file was already complete). When every attempt fails the
    /// failure is logged and `cumulative` comes back unchanged.
    pub async fn download_file(
        &self,
        file_id: &str,
        local_path: &Path,
        cumulative: u64,
        folder: Option<FolderContext>,
    ) -> u64 {
        let result = retry::retry_until_connected(
            &self.config.retry,
            self.connectivity,
            |e: &TransferError| {
                if e.is_retryable() {
                    RetryAction::Retry
                } else {
                    RetryAction::Abort
                }
            },
            || self.attempt_download(file_id, local_path, folder),
        )
        .await;

        match result {
            Ok(total) => cumulative + total,
            Err(TransferError::Cancelled(path)) => {
                tracing::info!("Stopped {}; the partial file is kept for resume", path);
                cumulative
            }
            Err(e) => {
                tracing::error!(
                    "Failed to download {} after {} attempts: {}",
                    local_path.display(),
                    self.config.retry.max_attempts,
                    e
                );
                cumulative
            }
        }
    }

    /// One attempt: metadata fetch, local size check, ranged GET, stream to
    /// disk. Returns the remote size.
    async fn attempt_download(
        &self,
        file_id: &str,
        local_path: &Path,
        folder: Option<FolderContext>,
    ) -> Result<u64, TransferError> {
        let path_str = local_path.display().to_string();
        if self.shutdown.is_cancelled() {
            return Err(TransferError::Cancelled(path_str));
        }

        let item = self.drive.metadata(file_id).await?;
        let total = item.size.ok_or_else(|| TransferError::MissingSize {
            id: file_id.to_string(),
        })?;

        let existing = existing_len(local_path).await?;
        if existing >= total {
            tracing::info!("{} is already downloaded. Skipping.", path_str);
            return Ok(total);
        }

        let token = self.drive.bearer_token().await?;
        let url = self.drive.content_url(file_id);

        if existing > 0 {
            tracing::info!(
                "Resuming download of {} from {}",
                path_str,
                format_size(existing)
            );
        } else {
            tracing::info!("Downloading {} ({})", path_str, format_size(total));
        }

        tracing::debug!("GET {} (Range: bytes={}-)", url, existing);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(RANGE, format!("bytes={}-", existing))
            .send()
            .await
            .map_err(|source| TransferError::Http {
                source,
                path: path_str.clone(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::HttpStatus {
                status: status.as_u16(),
                path: path_str,
            });
        }

        // Anything but 206 carries the whole file from byte zero.
        let offset = if status == StatusCode::PARTIAL_CONTENT {
            existing
        } else {
            if existing > 0 {
                tracing::warn!(
                    "Server ignored the range for {}; restarting from zero",
                    path_str
                );
            }
            0
        };
        if let Some(len) = response.content_length() {
            if len != total - offset {
                return Err(TransferError::SizeMismatch {
                    path: path_str,
                    expected: total - offset,
                    actual: len,
                });
            }
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if offset > 0 {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let mut file = options.open(local_path).await?;

        let name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path_str.clone());
        let bar = self
            .progress
            .start_file(&name, total, offset, folder.map(|f| f.position()));

        let body = response.bytes_stream().map_err(std::io::Error::other);
        let reader = StreamReader::new(body);
        tokio::pin!(reader);

        let outcome = self
            .stream_to_file(&mut reader, &mut file, bar.as_ref(), offset, total, &path_str)
            .await;
        let flushed = file.flush().await.map_err(TransferError::from);

        let verified = match (outcome, flushed) {
            (Ok(written), Ok(())) if written == total => Ok(()),
            (Ok(written), Ok(())) => Err(TransferError::SizeMismatch {
                path: path_str.clone(),
                expected: total,
                actual: written,
            }),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };

        match verified {
            Ok(()) => {
                bar.finish();
                tracing::info!("Downloaded: {} ({})", path_str, format_size(total));
                Ok(total)
            }
            Err(e) => {
                bar.abandon();
                Err(e)
            }
        }
    }

    /// Copy the body to `file` in [`CHUNK_SIZE`] reads, reporting progress
    /// after each chunk and throughput once per sampling window. Returns the
    /// file length reached.
    async fn stream_to_file<R>(
        &self,
        reader: &mut R,
        file: &mut fs::File,
        bar: &dyn FileProgress,
        existing: u64,
        total: u64,
        path_str: &str,
    ) -> Result<u64, TransferError>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut completed = existing;
        let mut sampler = ThroughputSampler::new(Instant::now());

        loop {
            if self.shutdown.is_cancelled() {
                return Err(TransferError::Cancelled(path_str.to_string()));
            }
            let n = reader
                .read(&mut buf)
                .await
                .map_err(|source| TransferError::Stream {
                    source,
                    path: path_str.to_string(),
                    bytes_written: completed - existing,
                })?;
            if n == 0 {
                return Ok(completed);
            }
            file.write_all(&buf[..n]).await?;
            completed += n as u64;
            let rate = sampler.record(n as u64, Instant::now());
            bar.update(completed, total, rate);
        }
    }
}
