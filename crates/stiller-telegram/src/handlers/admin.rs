//! Admin-only broadcast and stats commands, gated by the configured id list.

use std::time::Duration;

use teloxide::{prelude::*, types::Message};

use crate::router::AppState;

const BROADCAST_BATCH: usize = 50;
const BROADCAST_PAUSE: Duration = Duration::from_millis(50);

pub async fn handle_broadcast(
    bot: Bot,
    msg: &Message,
    state: &AppState,
    user_id: i64,
    message: &str,
) -> ResponseResult<()> {
    if !state.cfg.is_admin(user_id) {
        return Ok(());
    }

    if message.is_empty() {
        bot.send_message(
            msg.chat.id,
            "📢 Broadcast\n\nUsage: /broadcast <message>\n\nSend a message to all active users.",
        )
        .await?;
        return Ok(());
    }

    let users = match state.repo.active_users().await {
        Ok(users) => users,
        Err(e) => {
            tracing::warn!("failed to get users: {e}");
            bot.send_message(msg.chat.id, "❌ Failed to fetch users from database.")
                .await?;
            return Ok(());
        }
    };

    if users.is_empty() {
        bot.send_message(msg.chat.id, "⚠️ No active users found.")
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, format!("📤 Broadcasting to {} users...", users.len()))
        .await?;

    let mut sent = 0usize;
    let mut failed = 0usize;
    let mut blocked = 0usize;

    for (i, user) in users.iter().enumerate() {
        match bot
            .send_message(ChatId(user.user_id), message.to_string())
            .await
        {
            Ok(_) => sent += 1,
            Err(e) => {
                let text = e.to_string();
                if text.contains("blocked") || text.contains("user is deactivated") {
                    blocked += 1;
                } else {
                    tracing::warn!("failed to send to user {}: {e}", user.user_id);
                    failed += 1;
                }
            }
        }

        if (i + 1) % BROADCAST_BATCH == 0 {
            tokio::time::sleep(BROADCAST_PAUSE).await;
        }
    }

    bot.send_message(
        msg.chat.id,
        format!(
            "✅ Broadcast complete\n\n📬 Sent: {sent}\n🚫 Blocked: {blocked}\n❌ Failed: {failed}\n📊 Total users: {}",
            users.len()
        ),
    )
    .await?;

    Ok(())
}

pub async fn handle_stats(
    bot: Bot,
    msg: &Message,
    state: &AppState,
    user_id: i64,
) -> ResponseResult<()> {
    if !state.cfg.is_admin(user_id) {
        return Ok(());
    }

    let count = match state.repo.user_count().await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("failed to get user count: {e}");
            bot.send_message(msg.chat.id, "❌ Failed to fetch statistics.")
                .await?;
            return Ok(());
        }
    };

    bot.send_message(
        msg.chat.id,
        format!(
            "📊 Bot statistics\n\n👥 Active users: {count}\n🕒 Server time: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
    )
    .await?;

    Ok(())
}
