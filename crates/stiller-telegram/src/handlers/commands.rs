use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use stiller_core::{i18n, session::SessionState, Error};

use crate::handlers::{admin, lang_of, pack};
use crate::router::AppState;

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    text: &str,
) -> ResponseResult<()> {
    let lang = lang_of(&msg);
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or_default();

    let mut parts = text.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let args = parts.next().unwrap_or_default().trim();

    match name {
        "/start" => {
            state.sessions.clear(user_id).await;
            let username = msg
                .from()
                .and_then(|u| u.username.clone())
                .unwrap_or_default();
            bot.send_message(msg.chat.id, i18n::translate(&lang, "welcome", &[&username]))
                .await?;
        }

        "/help" => {
            bot.send_message(msg.chat.id, i18n::t(&lang, "help")).await?;
        }

        "/list" => {
            handle_list(bot, &msg, &state, &lang, user_id).await?;
        }

        "/delete" => {
            let Ok(pack_id) = args.parse::<i64>() else {
                bot.send_message(msg.chat.id, i18n::t(&lang, "delete-usage"))
                    .await?;
                return Ok(());
            };
            handle_delete(bot, &msg, &state, &lang, user_id, pack_id).await?;
        }

        "/cancel" => {
            let session = state.sessions.get(user_id).await;
            if session.state == SessionState::Idle {
                bot.send_message(msg.chat.id, i18n::t(&lang, "help")).await?;
            } else {
                state.sessions.clear(user_id).await;
                bot.send_message(msg.chat.id, i18n::t(&lang, "cancelled"))
                    .await?;
            }
        }

        "/broadcast" => {
            admin::handle_broadcast(bot, &msg, &state, user_id, args).await?;
        }

        "/stats" => {
            admin::handle_stats(bot, &msg, &state, user_id).await?;
        }

        // Unknown commands fall through to link detection, like any text.
        _ => return pack::handle_text(bot, msg, state, text).await,
    }

    Ok(())
}

async fn handle_list(
    bot: Bot,
    msg: &Message,
    state: &AppState,
    lang: &str,
    user_id: i64,
) -> ResponseResult<()> {
    let mut packs = match state.repo.packs_by_owner(user_id).await {
        Ok(packs) => packs,
        Err(e) => {
            tracing::warn!("error getting packs for user {user_id}: {e}");
            bot.send_message(msg.chat.id, i18n::t(lang, "error")).await?;
            return Ok(());
        }
    };

    if packs.is_empty() {
        bot.send_message(msg.chat.id, i18n::t(lang, "list-empty"))
            .await?;
        return Ok(());
    }

    // Stored newest-first; display in creation order.
    packs.sort_by_key(|p| p.id);

    let mut message = i18n::t(lang, "list-header");
    for pack in &packs {
        message.push_str(&i18n::translate(
            lang,
            "list-item",
            &[
                &pack.id.to_string(),
                &pack.title,
                pack.kind.as_str(),
                &pack.item_count.to_string(),
                &pack.link,
            ],
        ));
    }

    bot.send_message(msg.chat.id, message).await?;
    Ok(())
}

async fn handle_delete(
    bot: Bot,
    msg: &Message,
    state: &AppState,
    lang: &str,
    user_id: i64,
    pack_id: i64,
) -> ResponseResult<()> {
    match state.repo.delete_pack(pack_id, user_id).await {
        Ok(()) => {
            bot.send_message(msg.chat.id, i18n::t(lang, "delete-success"))
                .await?;
        }
        Err(Error::NotFoundOrNotOwned) => {
            bot.send_message(msg.chat.id, i18n::t(lang, "delete-not-found"))
                .await?;
        }
        Err(e) => {
            tracing::warn!("error deleting pack {pack_id} for user {user_id}: {e}");
            bot.send_message(msg.chat.id, i18n::t(lang, "error")).await?;
        }
    }
    Ok(())
}
