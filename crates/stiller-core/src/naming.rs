//! User-supplied pack name normalization and validation.
//!
//! Normalized names become permanent public pack-link components, so the
//! transform must be pure and deterministic.

/// Maximum length Telegram accepts for the user-chosen part of a set name.
pub const MAX_NAME_LEN: usize = 64;

/// Validation failure for a normalized name, with a stable i18n key each.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NameError {
    #[error("pack name is empty after normalization")]
    Empty,
    #[error("pack name exceeds {MAX_NAME_LEN} characters")]
    TooLong,
}

impl NameError {
    pub fn i18n_key(&self) -> &'static str {
        match self {
            NameError::Empty => "name-empty",
            NameError::TooLong => "name-too-long",
        }
    }
}

/// Normalize free-form text into a platform-legal identifier candidate.
///
/// Lowercases, trims, collapses whitespace runs and any run of characters
/// outside `[a-z0-9_]` to a single underscore, then trims leading/trailing
/// underscores. Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;

    for ch in input.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            // Whitespace, underscores and every other character collapse
            // into a single separator.
            pending_sep = true;
        }
    }

    out
}

/// Validate a normalized name. By construction the result of [`normalize`]
/// only ever fails on length, never on character class.
pub fn validate(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }
    debug_assert!(name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    Ok(())
}

/// Internal set name: normalized title plus a suffix derived from the
/// publishing bot's identity. Avoids collisions across bots, not users.
pub fn set_name(normalized: &str, agent: &str) -> String {
    format!("{normalized}_by_{agent}")
}
