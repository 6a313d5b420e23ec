use std::sync::Arc;

use teloxide::{
    dispatching::Dispatcher,
    dptree,
    prelude::*,
    types::BotCommand,
    update_listeners::webhooks,
};

use stiller_core::{
    config::BotConfig, i18n, session::SessionStore, storage::PackRepository,
};

use crate::handlers;
use crate::TelegramPlatform;

pub struct AppState {
    pub cfg: BotConfig,
    pub sessions: SessionStore,
    pub repo: PackRepository,
    pub platform: Arc<TelegramPlatform>,
}

/// Register the command menu and dispatch updates until shutdown.
///
/// With `PUBLIC_URL` set the bot listens for webhook pushes; otherwise it
/// long-polls (local development).
pub async fn run(bot: Bot, state: Arc<AppState>) -> anyhow::Result<()> {
    let commands = vec![
        BotCommand::new("start", i18n::t("en", "start-command")),
        BotCommand::new("help", i18n::t("en", "help-command")),
        BotCommand::new("list", i18n::t("en", "list-command")),
        BotCommand::new("delete", i18n::t("en", "delete-command")),
        BotCommand::new("cancel", i18n::t("en", "cancel-command")),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        tracing::warn!("failed to register bot commands: {e}");
    }

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![state.clone()])
        .enable_ctrlc_handler()
        .build();

    match &state.cfg.public_url {
        Some(public_url) => {
            let addr = ([0, 0, 0, 0], state.cfg.port).into();
            let url = format!("{public_url}/webhook").parse()?;
            tracing::info!("using webhook mode: {public_url}/webhook");

            let listener = webhooks::axum(bot, webhooks::Options::new(addr, url)).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("update listener error"),
                )
                .await;
        }
        None => {
            tracing::info!("using long polling mode");
            dispatcher.dispatch().await;
        }
    }

    Ok(())
}
