//! Recognition of sticker/emoji pack share links.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::PackKind;

fn sticker_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:https?://)?(?:www\.)?t\.me/addstickers/([a-zA-Z0-9_]+)")
            .expect("valid regex")
    })
}

fn emoji_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:https?://)?(?:www\.)?t\.me/addemoji/([a-zA-Z0-9_]+)").expect("valid regex")
    })
}

/// Extract the pack name and kind from a share link, if the text is one.
pub fn parse_pack_link(text: &str) -> Option<(String, PackKind)> {
    if let Some(caps) = sticker_link_re().captures(text) {
        return Some((caps[1].to_string(), PackKind::Sticker));
    }
    if let Some(caps) = emoji_link_re().captures(text) {
        return Some((caps[1].to_string(), PackKind::CustomEmoji));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sticker_links_with_and_without_scheme() {
        for text in [
            "https://t.me/addstickers/CoolCats",
            "http://www.t.me/addstickers/CoolCats",
            "t.me/addstickers/CoolCats",
            "check this out: t.me/addstickers/CoolCats !!",
        ] {
            let (name, kind) = parse_pack_link(text).expect("should parse");
            assert_eq!(name, "CoolCats");
            assert_eq!(kind, PackKind::Sticker);
        }
    }

    #[test]
    fn parses_emoji_links() {
        let (name, kind) = parse_pack_link("https://t.me/addemoji/Party_Emoji_1").unwrap();
        assert_eq!(name, "Party_Emoji_1");
        assert_eq!(kind, PackKind::CustomEmoji);
    }

    #[test]
    fn rejects_non_links() {
        assert!(parse_pack_link("hello there").is_none());
        assert!(parse_pack_link("https://t.me/somechannel").is_none());
    }
}
