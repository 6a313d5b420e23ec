//! Telegram adapter (teloxide).
//!
//! Implements the `stiller-core` `PackPlatform` port over the Telegram Bot
//! API and maps platform rejections into the core error taxonomy.

use std::path::Path;

use async_trait::async_trait;

use teloxide::{
    net::Download,
    prelude::*,
    types::{InputFile, InputSticker, StickerType},
};

use stiller_core::{
    domain::{DownloadedItem, ItemFormat, PackKind, RemoteFileRef, SourcePack, SourcePackItem, UserId},
    ports::PackPlatform,
    Error, ErrorCode, Result,
};

pub mod handlers;
pub mod router;

const DEFAULT_EMOJI: &str = "😀";

#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
    agent_name: String,
}

impl TelegramPlatform {
    pub fn new(bot: Bot, agent_name: String) -> Self {
        Self { bot, agent_name }
    }

    fn owner(user: UserId) -> teloxide::types::UserId {
        teloxide::types::UserId(user.0 as u64)
    }

    fn input_sticker(item: &DownloadedItem) -> InputSticker {
        let file = InputFile::file(item.path.clone());
        match item.item.format {
            ItemFormat::Static => InputSticker::Png(file),
            ItemFormat::Animated => InputSticker::Tgs(file),
            ItemFormat::Video => InputSticker::Webm(file),
        }
    }

    fn emojis(item: &DownloadedItem) -> String {
        item.item
            .emoji
            .clone()
            .unwrap_or_else(|| DEFAULT_EMOJI.to_string())
    }
}

#[async_trait]
impl PackPlatform for TelegramPlatform {
    fn agent_name(&self) -> &str {
        &self.agent_name
    }

    async fn fetch_pack(&self, name: &str) -> Result<SourcePack> {
        let set = self
            .bot
            .get_sticker_set(name.to_string())
            .await
            .map_err(|e| map_fetch_error(name, e))?;

        let items = set
            .stickers
            .iter()
            .map(|s| SourcePackItem {
                file: RemoteFileRef(s.file.id.clone()),
                format: if s.is_animated() {
                    ItemFormat::Animated
                } else if s.is_video() {
                    ItemFormat::Video
                } else {
                    ItemFormat::Static
                },
                emoji: s.emoji.clone(),
            })
            .collect();

        Ok(SourcePack {
            name: set.name.clone(),
            title: set.title.clone(),
            items,
        })
    }

    async fn download_to(&self, file: &RemoteFileRef, dest: &Path) -> Result<()> {
        let remote = self
            .bot
            .get_file(file.0.clone())
            .await
            .map_err(|e| Error::Platform(format!("failed to get file: {e}")))?;

        let mut out = tokio::fs::File::create(dest).await?;
        self.bot
            .download_file(&remote.path, &mut out)
            .await
            .map_err(|e| Error::Platform(format!("failed to download file: {e}")))?;
        Ok(())
    }

    async fn create_pack(
        &self,
        owner: UserId,
        set_name: &str,
        title: &str,
        kind: PackKind,
        first: &DownloadedItem,
    ) -> Result<()> {
        let mut req = self.bot.create_new_sticker_set(
            Self::owner(owner),
            set_name.to_string(),
            title.to_string(),
            Self::input_sticker(first),
            Self::emojis(first),
        );
        if kind == PackKind::CustomEmoji {
            req = req.sticker_type(StickerType::CustomEmoji);
        }

        req.await.map_err(|e| map_create_error(set_name, e))?;
        Ok(())
    }

    async fn append_item(
        &self,
        owner: UserId,
        set_name: &str,
        item: &DownloadedItem,
    ) -> Result<()> {
        self.bot
            .add_sticker_to_set(
                Self::owner(owner),
                set_name.to_string(),
                Self::input_sticker(item),
                Self::emojis(item),
            )
            .await
            .map_err(|e| Error::Platform(format!("failed to add sticker: {e}")))?;
        Ok(())
    }
}

/// A missing source pack is a classified domain error; anything else stays
/// unclassified so the retry wrapper can act on it.
fn map_fetch_error(name: &str, e: teloxide::RequestError) -> Error {
    let text = e.to_string();
    if text.contains("STICKERSET_INVALID") || text.contains("not found") || text.contains("404") {
        return Error::classified(ErrorCode::PackNotFound, format!("sticker set not found: {name}"));
    }
    Error::Platform(format!("telegram error fetching sticker set: {e}"))
}

/// Telegram reports a taken set name as a 400 with a well-known message;
/// matched on text the same way the bot always has.
fn map_create_error(set_name: &str, e: teloxide::RequestError) -> Error {
    let text = e.to_string();
    if text.contains("name is already occupied") || text.contains("409") {
        return Error::classified(
            ErrorCode::NameTaken,
            format!("sticker set name already exists: {set_name}"),
        );
    }
    Error::classified(
        ErrorCode::PlatformApi,
        format!("failed to create sticker set: {e}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(msg: &str) -> teloxide::RequestError {
        teloxide::RequestError::Api(teloxide::ApiError::Unknown(msg.to_string()))
    }

    #[test]
    fn fetch_not_found_is_classified() {
        let err = map_fetch_error("x", api_error("Bad Request: STICKERSET_INVALID"));
        assert_eq!(err.code(), Some(ErrorCode::PackNotFound));
    }

    #[test]
    fn fetch_transport_errors_stay_retryable() {
        let err = map_fetch_error("x", api_error("Internal Server Error"));
        assert!(err.code().is_none());
        assert!(!err.is_classified());
    }

    #[test]
    fn occupied_name_is_classified_as_name_taken() {
        let err = map_create_error(
            "my_pack_by_bot",
            api_error("Bad Request: sticker set name is already occupied"),
        );
        assert_eq!(err.code(), Some(ErrorCode::NameTaken));
    }

    #[test]
    fn other_create_failures_are_terminal_platform_errors() {
        let err = map_create_error("my_pack_by_bot", api_error("Bad Request: PEER_ID_INVALID"));
        assert_eq!(err.code(), Some(ErrorCode::PlatformApi));
    }
}
