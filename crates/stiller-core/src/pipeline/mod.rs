//! The pack-cloning pipeline: fetch -> download -> publish.

pub mod download;
pub mod publish;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::{
    domain::{PackKind, SourcePack, SourcePackItem, UserId},
    ports::PackPlatform,
    retry::with_retry,
    storage::PackRepository,
    Error, Result,
};

/// Rate-limited progress signal: `(current, total)` processed items.
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Everything a single clone operation needs, captured from the session.
#[derive(Clone, Debug)]
pub struct CloneRequest {
    pub owner: UserId,
    /// Raw user-supplied title; the publisher normalizes it for the set name.
    pub title: String,
    pub kind: PackKind,
    pub items: Vec<SourcePackItem>,
}

/// Resolve a source pack, retrying transient platform failures.
pub async fn fetch_source_pack(platform: &dyn PackPlatform, name: &str) -> Result<SourcePack> {
    with_retry(|| platform.fetch_pack(name)).await
}

/// Run one end-to-end clone: download all items concurrently, then create
/// and fill the destination pack sequentially. Returns the public link.
///
/// Temp files of every downloaded item are removed when this returns,
/// whether the publish succeeded or not.
pub async fn clone_pack(
    platform: Arc<dyn PackPlatform>,
    repo: Option<&PackRepository>,
    temp_dir: &Path,
    req: CloneRequest,
    progress: Option<&ProgressFn>,
) -> Result<String> {
    let downloaded = download::download_all(platform.clone(), req.items, temp_dir).await;
    let _cleanup = CleanupGuard::new(downloaded.iter().map(|d| d.path.clone()).collect());

    if downloaded.is_empty() {
        warn!("no items could be downloaded for user {}", req.owner.0);
        return Err(Error::NoItemsDownloaded);
    }

    publish::publish(
        platform.as_ref(),
        repo,
        req.owner,
        &req.title,
        req.kind,
        &downloaded,
        progress,
    )
    .await
}

/// Removes the listed files when dropped, best-effort.
struct CleanupGuard {
    paths: Vec<PathBuf>,
}

impl CleanupGuard {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            if let Err(e) = std::fs::remove_file(path) {
                warn!("failed to delete temp file {}: {e}", path.display());
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::{
        domain::{DownloadedItem, ItemFormat, PackKind, RemoteFileRef, SourcePack, SourcePackItem, UserId},
        ports::PackPlatform,
        Error, ErrorCode, Result,
    };

    pub fn item(id: &str) -> SourcePackItem {
        SourcePackItem {
            file: RemoteFileRef(id.to_string()),
            format: ItemFormat::Static,
            emoji: Some("😀".to_string()),
        }
    }

    pub fn items(n: usize) -> Vec<SourcePackItem> {
        (0..n).map(|i| item(&format!("file-{i}"))).collect()
    }

    pub fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("stiller-{tag}-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// In-memory platform double; failures are keyed by file id.
    #[derive(Default)]
    pub struct MockPlatform {
        pub fail_downloads: HashSet<String>,
        pub fail_appends: HashSet<String>,
        pub name_taken: bool,
        pub download_calls: AtomicUsize,
        pub created: Mutex<Vec<(String, String)>>,
        pub appended: Mutex<Vec<String>>,
    }

    impl MockPlatform {
        pub fn create_count(&self) -> usize {
            self.created.lock().unwrap().len()
        }

        pub fn append_count(&self) -> usize {
            self.appended.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PackPlatform for MockPlatform {
        fn agent_name(&self) -> &str {
            "stillerbot"
        }

        async fn fetch_pack(&self, name: &str) -> Result<SourcePack> {
            Ok(SourcePack {
                name: name.to_string(),
                title: name.to_string(),
                items: items(3),
            })
        }

        async fn download_to(&self, file: &RemoteFileRef, dest: &Path) -> Result<()> {
            self.download_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_downloads.contains(&file.0) {
                return Err(Error::Platform(format!("download failed: {}", file.0)));
            }
            tokio::fs::write(dest, b"stub-bytes").await?;
            Ok(())
        }

        async fn create_pack(
            &self,
            _owner: UserId,
            set_name: &str,
            title: &str,
            _kind: PackKind,
            _first: &DownloadedItem,
        ) -> Result<()> {
            if self.name_taken {
                return Err(Error::classified(
                    ErrorCode::NameTaken,
                    format!("set name already occupied: {set_name}"),
                ));
            }
            self.created
                .lock()
                .unwrap()
                .push((set_name.to_string(), title.to_string()));
            Ok(())
        }

        async fn append_item(
            &self,
            _owner: UserId,
            _set_name: &str,
            item: &DownloadedItem,
        ) -> Result<()> {
            if self.fail_appends.contains(&item.item.file.0) {
                return Err(Error::Platform(format!(
                    "append failed: {}",
                    item.item.file.0
                )));
            }
            self.appended.lock().unwrap().push(item.item.file.0.clone());
            Ok(())
        }
    }
}
