/// Stable codes for errors the user-facing layer reports verbatim.
///
/// A classified error is never retried: retrying "not found" or "name taken"
/// cannot succeed, so the retry wrapper propagates it unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    PackNotFound,
    NameTaken,
    PlatformApi,
}

impl ErrorCode {
    /// Localization key for the user-facing reply.
    pub fn i18n_key(self) -> &'static str {
        match self {
            ErrorCode::PackNotFound => "pack-not-found",
            ErrorCode::NameTaken => "name-taken",
            ErrorCode::PlatformApi => "error",
        }
    }
}

/// Core error type.
///
/// The Telegram adapter maps its request errors into this type so the bot
/// core can handle failures consistently (classified vs retryable).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// Domain error with a stable code; exempt from retry.
    #[error("[{code:?}] {message}")]
    Classified { code: ErrorCode, message: String },

    /// Unclassified platform/transport failure; eligible for retry.
    #[error("platform error: {0}")]
    Platform(String),

    #[error("max retries exceeded after {attempts} attempts: {source}")]
    MaxRetriesExceeded {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// Every per-item download failed; the clone aborts before any remote
    /// publish call is made.
    #[error("no items could be downloaded")]
    NoItemsDownloaded,

    /// Ownership-scoped delete matched zero rows.
    #[error("pack not found or not owned by user")]
    NotFoundOrNotOwned,
}

impl Error {
    pub fn classified(code: ErrorCode, message: impl Into<String>) -> Self {
        Error::Classified {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Classified { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, Error::Classified { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
