use std::path::Path;

use anyhow::{Context, Result};

use super::format::format_size;
use super::size::compute_folder_size;
use super::{Downloader, FolderContext};
use crate::drive::{self, ItemKind};

impl Downloader<'_> {
    /// Mirror the remote folder `folder_id` into `local_dir`, recursing into
    /// subfolders and downloading files one at a time.
    ///
    /// `cumulative` is threaded through the whole walk and returned with the
    /// bytes of every file that completed. A listing failure at any depth
    /// aborts the walk; a file that exhausts its attempts is skipped.
    pub async fn download_folder(
        &self,
        folder_id: &str,
        local_dir: &Path,
        cumulative: u64,
    ) -> Result<u64> {
        let mut cumulative = cumulative;
        let dir_str = local_dir.display().to_string();

        tokio::fs::create_dir_all(local_dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir_str))?;

        let children = drive::list_all_children(self.drive, folder_id)
            .await
            .with_context(|| format!("Failed to list folder {}", dir_str))?;

        if children.is_empty() {
            tracing::warn!("The folder {} is empty.", dir_str);
            return Ok(cumulative);
        }

        tracing::info!("Calculating the size of folder {}...", dir_str);
        let total_size = compute_folder_size(self.drive, folder_id)
            .await
            .with_context(|| format!("Failed to compute size of folder {}", dir_str))?;
        let file_count = children.len();

        tracing::info!(
            items = file_count,
            "Starting download for folder: {} ({})",
            dir_str,
            format_size(total_size)
        );

        for (index, child) in children.iter().enumerate() {
            if self.shutdown.is_cancelled() {
                tracing::info!("Shutdown requested, skipping the rest of {}", dir_str);
                break;
            }
            let child_path = local_dir.join(&child.name);
            cumulative = match child.kind {
                ItemKind::Folder => {
                    Box::pin(self.download_folder(&child.id, &child_path, cumulative)).await?
                }
                ItemKind::File => {
                    let context = FolderContext {
                        total_size,
                        file_count,
                        file_index: index + 1,
                    };
                    self.download_file(&child.id, &child_path, cumulative, Some(context))
                        .await
                }
            };
        }

        tracing::info!(
            "Folder: {} - Total size: {} (downloaded so far: {})",
            dir_str,
            format_size(total_size),
            format_size(cumulative)
        );
        Ok(cumulative)
    }
}
