//! Text templates for user-facing replies.
//!
//! Templates use `{0}`, `{1}`, ... positional placeholders. Lookup falls back
//! to English when the key or language is absent.

fn en(key: &str) -> Option<&'static str> {
    Some(match key {
        "welcome" => "Welcome to Sticker & Emoji Stiller @{0}!\n\nSend me one of the following:\n\nSticker pack link: t.me/addstickers/[pack_name]\nEmoji pack link: t.me/addemoji/[pack_name]\n\nI'll help you create a copy of the pack under your ownership!",
        "help" => "Send me one of the following:\n\nSticker pack link: t.me/addstickers/[pack_name]\nEmoji pack link: t.me/addemoji/[pack_name]\n\nI'll help you create a copy of the pack under your ownership!",

        "start-command" => "Start (or restart) bot",
        "help-command" => "Show help message",
        "list-command" => "List your created packs",
        "delete-command" => "Delete a pack by ID",
        "cancel-command" => "Cancel current operation",

        "pack-stats" => "📦 Found {0} pack: \"{1}\"\n📊 Contains: {2} items\n\nWhat would you like to name your new pack?\n\nType /cancel to cancel",
        "creating-pack" => "Creating your {0} pack... This may take a while.",
        "processing" => "📦 Processing: {0}/{1} items...",
        "success" => "✅ Success! Your {0} pack is ready:\n🔗 {1}",
        "no-pack-data" => "No pack data found. Please start over.",
        "error" => "❌ Something went wrong. Please try again later.",
        "pack-not-found" => "Pack not found. Check the link and try again.",
        "name-taken" => "This pack name is already taken. Please choose a different name or type /cancel to cancel.",

        "name-empty" => "Pack name cannot be empty. Please enter a valid name or type /cancel to cancel.",
        "name-too-long" => "Pack name is too long (max 64 characters). Please enter a shorter name or type /cancel to cancel.",
        "cancelled" => "Operation cancelled.",

        "invalid-link" => "Invalid link. Please send a valid sticker or emoji pack link.",
        "pack-type" => "sticker",
        "emoji-type" => "emoji",

        "list-empty" => "You haven't created any packs yet.",
        "list-header" => "📦 Your packs:\n\n",
        "list-item" => "{0}. {1} ({2}) - {3} items\n {4}\n\n",
        "delete-success" => "✅ Pack deleted successfully!",
        "delete-not-found" => "Pack not found or you don't have permission to delete it.",
        "delete-usage" => "Usage: /delete <pack_id>\n\nUse /list to see your packs and their IDs.",
        _ => return None,
    })
}

fn ua(key: &str) -> Option<&'static str> {
    Some(match key {
        "help" => "Надішліть мені одне з наступного:\n\nПосилання на стікерпак: t.me/addstickers/[pack_name]\nПосилання на емодзі-пак: t.me/addemoji/[pack_name]\n\nЯ допоможу створити копію пака у вашій власності!",
        "pack-stats" => "📦 Знайдено {0} пак: \"{1}\"\n📊 Містить: {2} елементів\n\nЯк назвати ваш новий пак?\n\nНадішліть /cancel щоб скасувати",
        "creating-pack" => "Створюю ваш {0} пак... Це може зайняти деякий час.",
        "success" => "✅ Готово! Ваш {0} пак створено:\n🔗 {1}",
        "error" => "❌ Щось пішло не так. Спробуйте пізніше.",
        "pack-not-found" => "Пак не знайдено. Перевірте посилання та спробуйте ще раз.",
        "name-taken" => "Ця назва вже зайнята. Оберіть іншу назву або надішліть /cancel.",
        "name-empty" => "Назва не може бути порожньою. Введіть назву або надішліть /cancel.",
        "name-too-long" => "Назва задовга (макс. 64 символи). Введіть коротшу назву або надішліть /cancel.",
        "cancelled" => "Операцію скасовано.",
        "invalid-link" => "Невірне посилання. Надішліть дійсне посилання на стікер- або емодзі-пак.",
        "pack-type" => "стікер",
        "emoji-type" => "емодзі",
        "list-empty" => "Ви ще не створили жодного пака.",
        "list-header" => "📦 Ваші паки:\n\n",
        "delete-success" => "✅ Пак видалено!",
        "delete-not-found" => "Пак не знайдено або у вас немає прав на його видалення.",
        _ => return None,
    })
}

fn template<'a>(lang: &str, key: &'a str) -> &'a str {
    let localized = match lang {
        "uk" | "ua" => ua(key),
        _ => None,
    };
    localized.or_else(|| en(key)).unwrap_or(key)
}

/// Look up a template and substitute `{0}`, `{1}`, ... positional args.
pub fn translate(lang: &str, key: &str, args: &[&str]) -> String {
    let mut out = template(lang, key).to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), arg);
    }
    out
}

/// Shorthand for argument-free keys.
pub fn t(lang: &str, key: &str) -> String {
    translate(lang, key, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_positional_args() {
        let s = translate("en", "success", &["sticker", "https://t.me/addstickers/x"]);
        assert!(s.contains("sticker pack is ready"));
        assert!(s.ends_with("https://t.me/addstickers/x"));
    }

    #[test]
    fn falls_back_to_english_for_missing_keys_and_languages() {
        // "welcome" has no Ukrainian translation.
        assert_eq!(t("ua", "welcome"), t("en", "welcome"));
        // Unknown language falls back entirely.
        assert_eq!(t("de", "help"), t("en", "help"));
    }

    #[test]
    fn localized_key_wins_when_present() {
        assert_ne!(t("ua", "cancelled"), t("en", "cancelled"));
    }

    #[test]
    fn unknown_key_returns_the_key_itself() {
        assert_eq!(t("en", "does-not-exist"), "does-not-exist");
        // The key may be built at runtime; the fallback borrows it.
        let key = format!("missing-{}", 7);
        assert_eq!(t("en", &key), key);
    }
}
