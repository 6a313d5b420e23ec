//! Sequential creation of the destination pack.
//!
//! The remote append API must not be called concurrently for one pack, so
//! this stage is strictly ordered: create with the first item, then append
//! the rest one at a time.

use std::time::Duration;

use tracing::{info, warn};

use crate::{
    domain::{DownloadedItem, PackKind, UserId},
    naming,
    pipeline::ProgressFn,
    ports::PackPlatform,
    storage::{NewPack, PackRepository},
    Result,
};

/// Pause inserted after most appends to stay under platform rate limits.
/// The every-5th skip matches the cadence the bot has always used.
const APPEND_DELAY: Duration = Duration::from_millis(1);

/// Progress is reported every this many processed items, plus at the end.
const PROGRESS_EVERY: usize = 10;

/// Create the destination pack and fill it with `items`, in order.
///
/// Creation failure is terminal (a taken name arrives here already
/// classified). Append failures are logged and skipped; they only shrink the
/// final item count. The pack row is persisted best-effort: the user still
/// gets their link if the local write fails.
pub async fn publish(
    platform: &dyn PackPlatform,
    repo: Option<&PackRepository>,
    owner: UserId,
    title: &str,
    kind: PackKind,
    items: &[DownloadedItem],
    progress: Option<&ProgressFn>,
) -> Result<String> {
    let normalized = naming::normalize(title);
    let set_name = naming::set_name(&normalized, platform.agent_name());
    let link = kind.public_link(&set_name);

    let total = items.len();
    platform
        .create_pack(owner, &set_name, title, kind, &items[0])
        .await?;

    // Report from 0, which reads friendlier while the long append loop runs.
    if total > 1 {
        if let Some(cb) = progress {
            cb(0, total);
        }
    }

    let mut achieved = 1usize;
    for (i, item) in items.iter().enumerate().skip(1) {
        match platform.append_item(owner, &set_name, item).await {
            Ok(()) => achieved += 1,
            Err(e) => {
                warn!("failed to add item {}/{total} to {set_name}: {e}", i + 1);
            }
        }

        if let Some(cb) = progress {
            if (i + 1) % PROGRESS_EVERY == 0 || i + 1 == total {
                cb(i + 1, total);
            }
        }

        if i < total - 1 && i % 5 != 0 {
            tokio::time::sleep(APPEND_DELAY).await;
        }
    }

    info!("created {set_name} for user {} with {achieved}/{total} items", owner.0);

    if let Some(repo) = repo {
        let pack = NewPack {
            owner_id: owner.0,
            name: set_name.clone(),
            title: title.to_string(),
            kind,
            link: link.clone(),
            item_count: achieved as i64,
        };
        if let Err(e) = repo.create_pack(&pack).await {
            warn!("failed to save pack {set_name} to database: {e}");
        }
    }

    Ok(link)
}
