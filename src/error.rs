//! Unified error handling
//!
//! Structured error type shared by the lexicon store, the classifier adapter
//! and the comment sources. The cleaning pipeline itself never returns these.

use std::fmt;

use thiserror::Error;

/// Errors raised at the collaborator boundaries of the pipeline
#[derive(Error, Debug, Clone)]
pub enum KomentarError {
    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure (DNS, connect, TLS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Remote service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Payload could not be decoded
    #[error("parse error: {0}")]
    Parse(String),

    /// Local file access failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Slang dataset could not be loaded
    #[error("lexicon source error: {0}")]
    LexiconSource(String),

    /// The classifier cannot serve any request
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// A single inference call failed
    #[error("inference failed: {0}")]
    Inference(String),

    /// Comment feed could not be read
    #[error("comment source error: {0}")]
    CommentSource(String),

    /// Caller-supplied value was rejected
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl KomentarError {
    /// Whether the caller must stop instead of degrading to a default value
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            KomentarError::ClassifierUnavailable(_) | KomentarError::Config(_)
        )
    }

    /// How loudly this error should be reported
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            KomentarError::Config(_) => ErrorSeverity::Critical,
            KomentarError::ClassifierUnavailable(_) => ErrorSeverity::Critical,
            KomentarError::Network(_) => ErrorSeverity::Warning,
            KomentarError::Http { .. } => ErrorSeverity::Warning,
            KomentarError::LexiconSource(_) => ErrorSeverity::Warning,
            KomentarError::Inference(_) => ErrorSeverity::Warning,
            KomentarError::InvalidInput(_) => ErrorSeverity::Info,
            KomentarError::Parse(_) => ErrorSeverity::Error,
            KomentarError::Io(_) => ErrorSeverity::Error,
            KomentarError::CommentSource(_) => ErrorSeverity::Error,
        }
    }

    /// Appends context to the message, keeping the variant
    pub fn with_context<T: fmt::Display>(self, context: T) -> Self {
        let wrap = |msg: String| format!("{} ({})", msg, context);

        match self {
            KomentarError::Config(msg) => KomentarError::Config(wrap(msg)),
            KomentarError::Network(msg) => KomentarError::Network(wrap(msg)),
            KomentarError::Parse(msg) => KomentarError::Parse(wrap(msg)),
            KomentarError::Io(msg) => KomentarError::Io(wrap(msg)),
            KomentarError::LexiconSource(msg) => KomentarError::LexiconSource(wrap(msg)),
            KomentarError::ClassifierUnavailable(msg) => {
                KomentarError::ClassifierUnavailable(wrap(msg))
            }
            KomentarError::Inference(msg) => KomentarError::Inference(wrap(msg)),
            KomentarError::CommentSource(msg) => KomentarError::CommentSource(wrap(msg)),
            KomentarError::InvalidInput(msg) => KomentarError::InvalidInput(wrap(msg)),
            http @ KomentarError::Http { .. } => http,
        }
    }
}

/// Error severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl From<std::io::Error> for KomentarError {
    fn from(error: std::io::Error) -> Self {
        KomentarError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for KomentarError {
    fn from(error: serde_json::Error) -> Self {
        KomentarError::Parse(format!("JSON: {}", error))
    }
}

impl From<toml::de::Error> for KomentarError {
    fn from(error: toml::de::Error) -> Self {
        KomentarError::Config(format!("TOML: {}", error))
    }
}

impl From<reqwest::Error> for KomentarError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            KomentarError::Http {
                status: status.as_u16(),
                url: error
                    .url()
                    .map(|url| url.as_str().to_string())
                    .unwrap_or_default(),
            }
        } else if error.is_decode() {
            KomentarError::Parse(error.to_string())
        } else {
            KomentarError::Network(error.to_string())
        }
    }
}

/// Result alias used across the crate
pub type KomentarResult<T> = Result<T, KomentarError>;

/// Error handling helpers
pub mod helpers {
    use super::*;

    pub fn config_error<T: fmt::Display>(msg: T) -> KomentarError {
        KomentarError::Config(msg.to_string())
    }

    pub fn validation_error<T: fmt::Display>(msg: T) -> KomentarError {
        KomentarError::InvalidInput(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors() {
        assert!(KomentarError::ClassifierUnavailable("model missing".into()).is_fatal());
        assert!(!KomentarError::Inference("bad tensor".into()).is_fatal());
        assert!(!KomentarError::LexiconSource("offline".into()).is_fatal());
    }

    #[test]
    fn test_context_keeps_variant() {
        let error = KomentarError::Network("timed out".into()).with_context("rows offset 200");
        assert!(matches!(error, KomentarError::Network(_)));
        assert_eq!(error.to_string(), "network error: timed out (rows offset 200)");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Warning);
        assert_eq!(
            KomentarError::ClassifierUnavailable(String::new()).severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_helpers_pick_variant() {
        assert!(matches!(
            helpers::validation_error("empty video url"),
            KomentarError::InvalidInput(_)
        ));
        assert!(helpers::config_error("chunk_size must be positive").is_fatal());
    }
}
