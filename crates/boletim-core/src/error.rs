use thiserror::Error;

/// Top-level error type for Boletim.
#[derive(Debug, Error)]
pub enum SkillError {
    /// No message table is registered for the requested locale.
    #[error("locale not found: {0}")]
    LocaleNotFound(String),

    /// A locale table lacks a message the handlers rely on.
    #[error("message key {key} not found for locale {locale}")]
    MessageKeyNotFound { locale: String, key: String },

    /// The upstream could not be reached (DNS, TCP, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The upstream answered with a non-success status or an unreadable body.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The upstream answered but had nothing to report for the query.
    #[error("no data available for {0}")]
    NoDataAvailable(String),

    /// No registered handler accepted the request.
    #[error("unhandled request: {0}")]
    UnhandledRequest(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SkillError {
    /// Short, stable name of the variant for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LocaleNotFound(_) => "locale_not_found",
            Self::MessageKeyNotFound { .. } => "message_key_not_found",
            Self::Network(_) => "network",
            Self::Upstream(_) => "upstream",
            Self::NoDataAvailable(_) => "no_data",
            Self::UnhandledRequest(_) => "unhandled_request",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}
