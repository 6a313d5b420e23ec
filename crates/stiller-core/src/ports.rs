use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::{DownloadedItem, PackKind, RemoteFileRef, SourcePack, UserId},
    Result,
};

/// Hexagonal port over the messaging platform's pack APIs.
///
/// Telegram is the only implementation today; the adapter is expected to map
/// platform rejections into the core error taxonomy: "not found" and
/// "name taken" become classified errors, transport failures stay
/// unclassified so the retry wrapper can act on them.
#[async_trait]
pub trait PackPlatform: Send + Sync {
    /// Identity of the publishing bot, used as the set-name suffix.
    fn agent_name(&self) -> &str;

    /// Resolve a pack by name into its metadata and ordered item list.
    async fn fetch_pack(&self, name: &str) -> Result<SourcePack>;

    /// Stream-download a remote file into `dest`.
    async fn download_to(&self, file: &RemoteFileRef, dest: &Path) -> Result<()>;

    /// Create a new pack under `owner` containing exactly the first item.
    async fn create_pack(
        &self,
        owner: UserId,
        set_name: &str,
        title: &str,
        kind: PackKind,
        first: &DownloadedItem,
    ) -> Result<()>;

    /// Append one item to an existing pack.
    async fn append_item(&self, owner: UserId, set_name: &str, item: &DownloadedItem)
        -> Result<()>;
}
