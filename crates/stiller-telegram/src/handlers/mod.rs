//! Telegram update handlers.
//!
//! Every inbound message upserts the sender into the user table, then routes
//! to a command handler or to the pack-link / name-input flow.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use stiller_core::domain::TrackedUser;

use crate::router::AppState;

mod admin;
mod commands;
mod pack;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };

    tracing::info!("user: {}, message id: {}", user.id, msg.id.0);

    // Track the user for broadcast/stats; never block handling on it.
    let tracked = TrackedUser {
        user_id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()),
        last_name: user.last_name.clone(),
        language_code: user.language_code.clone(),
    };
    if let Err(e) = state.repo.upsert_user(&tracked).await {
        tracing::warn!("failed to track user {}: {e}", user.id);
    }

    let Some(text) = msg.text().map(|s| s.to_string()) else {
        return Ok(());
    };

    if text.starts_with('/') {
        return commands::handle_command(bot, msg, state, &text).await;
    }

    pack::handle_text(bot, msg, state, &text).await
}

/// Language the sender's replies should use.
pub(crate) fn lang_of(msg: &Message) -> String {
    msg.from()
        .and_then(|u| u.language_code.clone())
        .unwrap_or_else(|| "en".to_string())
}
