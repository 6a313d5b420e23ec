use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;

use stiller_core::{config::BotConfig, session::SessionStore, storage::PackRepository};
use stiller_telegram::{router, TelegramPlatform};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stiller_core::logging::init("stiller");

    let cfg = BotConfig::load().context("failed to load configuration")?;

    std::fs::create_dir_all(&cfg.temp_dir).context("failed to create temp directory")?;

    let repo = PackRepository::open(&cfg.db_path)
        .await
        .context("failed to initialize database")?;

    let bot = Bot::new(cfg.token.clone());
    let me = bot.get_me().await.context("failed to reach Telegram")?;
    tracing::info!("bot @{} started", me.username());

    let platform = Arc::new(TelegramPlatform::new(
        bot.clone(),
        me.username().to_string(),
    ));

    let state = Arc::new(router::AppState {
        cfg,
        sessions: SessionStore::new(),
        repo,
        platform,
    });

    router::run(bot, state).await
}
