use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use stiller_core::{
    domain::{PackKind, UserId},
    i18n, links, naming,
    pipeline::{self, CloneRequest},
    ports::PackPlatform,
    session::{Session, SessionState},
    Error, ErrorCode,
};

use crate::handlers::lang_of;
use crate::router::AppState;

/// Free text is either the awaited pack name or a (candidate) pack link —
/// never both: while a session is waiting for a name, links are not parsed.
pub async fn handle_text(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    text: &str,
) -> ResponseResult<()> {
    let lang = lang_of(&msg);
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or_default();

    let session = state.sessions.get(user_id).await;
    if session.state == SessionState::WaitingForName {
        return handle_name_input(bot, &msg, &state, &lang, user_id, session, text).await;
    }

    match links::parse_pack_link(text) {
        Some((pack_name, kind)) => {
            handle_pack_link(bot, &msg, &state, &lang, user_id, &pack_name, kind).await
        }
        None => {
            bot.send_message(msg.chat.id, i18n::t(&lang, "invalid-link"))
                .await?;
            Ok(())
        }
    }
}

/// Fetch the source pack and open a session awaiting the new pack's name.
/// A fetch while another session is waiting simply replaces it.
async fn handle_pack_link(
    bot: Bot,
    msg: &Message,
    state: &AppState,
    lang: &str,
    user_id: i64,
    pack_name: &str,
    kind: PackKind,
) -> ResponseResult<()> {
    let source = match pipeline::fetch_source_pack(state.platform.as_ref(), pack_name).await {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!("error fetching pack {pack_name}: {e}");
            bot.send_message(msg.chat.id, i18n::t(lang, error_key(&e)))
                .await?;
            return Ok(());
        }
    };

    bot.send_message(
        msg.chat.id,
        i18n::translate(
            lang,
            "pack-stats",
            &[
                &i18n::t(lang, kind.i18n_key()),
                &source.title,
                &source.items.len().to_string(),
            ],
        ),
    )
    .await?;

    state
        .sessions
        .set(
            user_id,
            Session {
                state: SessionState::WaitingForName,
                items: source.items,
                original_name: pack_name.to_string(),
                title: source.title,
                kind: Some(kind),
            },
        )
        .await;

    Ok(())
}

async fn handle_name_input(
    bot: Bot,
    msg: &Message,
    state: &AppState,
    lang: &str,
    user_id: i64,
    session: Session,
    input: &str,
) -> ResponseResult<()> {
    if session.items.is_empty() {
        state.sessions.clear(user_id).await;
        bot.send_message(msg.chat.id, i18n::t(lang, "no-pack-data"))
            .await?;
        return Ok(());
    }

    let normalized = naming::normalize(input);
    if let Err(e) = naming::validate(&normalized) {
        bot.send_message(msg.chat.id, i18n::t(lang, e.i18n_key()))
            .await?;
        return Ok(());
    }

    let kind = session.kind.unwrap_or(PackKind::Sticker);

    let progress_msg = bot
        .send_message(
            msg.chat.id,
            i18n::translate(lang, "creating-pack", &[&i18n::t(lang, kind.i18n_key())]),
        )
        .await
        .ok();

    // Progress edits are fire-and-forget; a failed edit never stalls the
    // append loop.
    let progress = progress_msg.as_ref().map(|pm| {
        let bot = bot.clone();
        let chat_id = pm.chat.id;
        let message_id = pm.id;
        let lang = lang.to_string();
        move |current: usize, total: usize| {
            let bot = bot.clone();
            let text = i18n::translate(
                &lang,
                "processing",
                &[&current.to_string(), &total.to_string()],
            );
            tokio::spawn(async move {
                if let Err(e) = bot.edit_message_text(chat_id, message_id, text).await {
                    tracing::warn!("failed to update progress: {e}");
                }
            });
        }
    });

    let request = CloneRequest {
        owner: UserId(user_id),
        title: input.to_string(),
        kind,
        items: session.items,
    };

    let result = pipeline::clone_pack(
        state.platform.clone() as Arc<dyn PackPlatform>,
        Some(&state.repo),
        &state.cfg.temp_dir,
        request,
        progress
            .as_ref()
            .map(|cb| cb as &(dyn Fn(usize, usize) + Send + Sync)),
    )
    .await;

    if let Some(pm) = &progress_msg {
        let _ = bot.delete_message(pm.chat.id, pm.id).await;
    }

    match result {
        Ok(link) => {
            bot.send_message(
                msg.chat.id,
                i18n::translate(
                    lang,
                    "success",
                    &[&i18n::t(lang, kind.i18n_key()), &link],
                ),
            )
            .await?;
            state.sessions.clear(user_id).await;
        }
        // A taken name keeps the session alive so the user can try another.
        Err(e) if e.code() == Some(ErrorCode::NameTaken) => {
            bot.send_message(msg.chat.id, i18n::t(lang, "name-taken"))
                .await?;
        }
        Err(e) => {
            tracing::warn!("error creating pack for user {user_id}: {e}");
            state.sessions.clear(user_id).await;
            bot.send_message(msg.chat.id, i18n::t(lang, error_key(&e)))
                .await?;
        }
    }

    Ok(())
}

/// Localization key for a pipeline failure: classified errors carry their
/// own key, everything else collapses to the generic message.
fn error_key(e: &Error) -> &'static str {
    match e.code() {
        Some(code) => code.i18n_key(),
        None => "error",
    }
}
