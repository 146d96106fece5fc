use crate::drive::error::DriveError;
use crate::drive::DriveService;

/// Recursive byte size of every non-folder item under `folder_id`.
///
/// Files without a declared size count as 0. Listing errors propagate
/// unchanged. The hierarchy is assumed acyclic; a folder that is its own
/// ancestor recurses without bound.
pub async fn compute_folder_size(
    drive: &dyn DriveService,
    folder_id: &str,
) -> Result<u64, DriveError> {
    let mut total_size: u64 = 0;
    let mut page_token: Option<String> = None;

    loop {
        let page = drive
            .list_children(folder_id, page_token.as_deref())
            .await?;
        for item in &page.items {
            let size = if item.is_folder() {
                Box::pin(compute_folder_size(drive, &item.id)).await?
            } else {
                item.size.unwrap_or(0)
            };
            total_size = total_size.saturating_add(size);
        }
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(total_size)
}
