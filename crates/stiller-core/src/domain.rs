use std::path::PathBuf;

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Opaque reference to a remote file on the platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteFileRef(pub String);

/// Binary format of a single pack item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemFormat {
    Static,
    Animated,
    Video,
}

impl ItemFormat {
    /// File extension used for the local temp copy.
    pub fn extension(self) -> &'static str {
        match self {
            ItemFormat::Static => "webp",
            ItemFormat::Animated => "tgs",
            ItemFormat::Video => "webm",
        }
    }
}

/// Kind of pack being cloned (drives the public link and the remote API).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackKind {
    Sticker,
    CustomEmoji,
}

impl PackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PackKind::Sticker => "sticker",
            PackKind::CustomEmoji => "emoji",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sticker" => Some(PackKind::Sticker),
            "emoji" => Some(PackKind::CustomEmoji),
            _ => None,
        }
    }

    /// Localization key for the human-readable pack kind.
    pub fn i18n_key(self) -> &'static str {
        match self {
            PackKind::Sticker => "pack-type",
            PackKind::CustomEmoji => "emoji-type",
        }
    }

    /// Public link under which the finished pack is reachable.
    pub fn public_link(self, set_name: &str) -> String {
        match self {
            PackKind::Sticker => format!("https://t.me/addstickers/{set_name}"),
            PackKind::CustomEmoji => format!("https://t.me/addemoji/{set_name}"),
        }
    }
}

/// One item of a source pack, fetched once per clone attempt.
#[derive(Clone, Debug)]
pub struct SourcePackItem {
    pub file: RemoteFileRef,
    pub format: ItemFormat,
    pub emoji: Option<String>,
}

/// A source pack's metadata plus its ordered item list.
#[derive(Clone, Debug)]
pub struct SourcePack {
    pub name: String,
    pub title: String,
    pub items: Vec<SourcePackItem>,
}

/// A source item together with the local path its bytes were downloaded to.
///
/// The path is owned by the clone operation and is removed unconditionally
/// when the operation exits.
#[derive(Clone, Debug)]
pub struct DownloadedItem {
    pub item: SourcePackItem,
    pub path: PathBuf,
}

/// Persisted record of a successfully created pack.
#[derive(Clone, Debug)]
pub struct PackRecord {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub title: String,
    pub kind: PackKind,
    pub link: String,
    pub item_count: i64,
    pub created_at: chrono::NaiveDateTime,
}

/// Tracked platform user, upserted on every inbound interaction.
#[derive(Clone, Debug, Default)]
pub struct TrackedUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}
