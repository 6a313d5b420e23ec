//! Concurrent fan-out download of a source pack's items.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::{
    domain::{DownloadedItem, SourcePackItem},
    ports::PackPlatform,
};

/// Download every item to a uniquely named temp file, one task per item.
///
/// Individual failures are logged and dropped; the result keeps the original
/// relative order of the survivors. All spawned tasks are joined before the
/// result is assembled, so no download outlives this call.
pub async fn download_all(
    platform: Arc<dyn PackPlatform>,
    items: Vec<SourcePackItem>,
    temp_dir: &Path,
) -> Vec<DownloadedItem> {
    let mut handles = Vec::with_capacity(items.len());

    for item in items {
        let platform = platform.clone();
        let dest = temp_dir.join(format!("{}.{}", Uuid::new_v4(), item.format.extension()));

        handles.push(tokio::spawn(async move {
            match platform.download_to(&item.file, &dest).await {
                Ok(()) => Some(DownloadedItem { item, path: dest }),
                Err(e) => {
                    warn!("failed to download item {}, skipping: {e}", item.file.0);
                    None
                }
            }
        }));
    }

    // Join in spawn order so survivors keep their original relative order.
    let mut downloaded = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(Some(item)) => downloaded.push(item),
            Ok(None) => {}
            Err(e) => warn!("download task panicked: {e}"),
        }
    }

    downloaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testutil::{items, temp_dir, MockPlatform};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn one_failure_drops_only_that_item_and_keeps_order() {
        let mut platform = MockPlatform::default();
        platform.fail_downloads.insert("file-2".to_string());
        let platform = Arc::new(platform);
        let dir = temp_dir("dl-one-fail");

        let out = download_all(platform.clone() as Arc<dyn PackPlatform>, items(5), &dir).await;

        assert_eq!(out.len(), 4);
        let ids: Vec<&str> = out.iter().map(|d| d.item.file.0.as_str()).collect();
        assert_eq!(ids, ["file-0", "file-1", "file-3", "file-4"]);
        assert_eq!(platform.download_calls.load(Ordering::SeqCst), 5);

        for d in &out {
            assert!(d.path.exists(), "missing temp file {}", d.path.display());
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn all_failures_yield_an_empty_result() {
        let mut platform = MockPlatform::default();
        for i in 0..3 {
            platform.fail_downloads.insert(format!("file-{i}"));
        }
        let dir = temp_dir("dl-all-fail");

        let out = download_all(Arc::new(platform) as Arc<dyn PackPlatform>, items(3), &dir).await;
        assert!(out.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn temp_files_are_uniquely_named() {
        let platform = Arc::new(MockPlatform::default());
        let dir = temp_dir("dl-unique");

        let out = download_all(platform as Arc<dyn PackPlatform>, items(8), &dir).await;
        let mut paths: Vec<_> = out.iter().map(|d| d.path.clone()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 8);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
