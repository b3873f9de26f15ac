//! Typed environment variable access
//!
//! Every variable the tool reads is declared once here, with its parser and a
//! description. Variables without a default only take effect when set, so
//! they can be layered over a config file.

use std::env;
use std::fmt;
use std::time::Duration;

/// Environment variable parse error
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// Environment variable accessor
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }
}

/// Process-level variables
pub mod core {
    use super::*;

    /// Log level
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "KOMENTAR_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// Slang lexicon variables
pub mod lexicon {
    use super::*;

    /// Dataset id on the datasets server
    pub struct Dataset;
    impl EnvVar<String> for Dataset {
        const NAME: &'static str = "KOMENTAR_LEXICON_DATASET";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Slang dataset id, e.g. zeroix07/indo-slang-words";

        fn parse(value: &str) -> EnvResult<String> {
            let dataset = value.trim();
            if dataset.split('/').filter(|part| !part.is_empty()).count() == 2 {
                Ok(dataset.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Dataset id must look like 'owner/name'".to_string(),
                })
            }
        }
    }

    /// Skip the remote dataset entirely
    pub struct Offline;
    impl EnvVar<bool> for Offline {
        const NAME: &'static str = "KOMENTAR_LEXICON_OFFLINE";
        const DEFAULT: Option<bool> = None;
        const DESCRIPTION: &'static str = "Use only the built-in slang table";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// Local mirror of the dataset
    pub struct File;
    impl EnvVar<String> for File {
        const NAME: &'static str = "KOMENTAR_LEXICON_FILE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "JSON or JSON-lines file with slang records";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }
}

/// Classifier endpoint variables
pub mod classifier {
    use super::*;

    /// Inference endpoint
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "KOMENTAR_CLASSIFIER_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Text-classification inference endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            parse_http_url(value, Self::NAME)
        }
    }

    /// Bearer token for the inference endpoint
    pub struct ApiToken;
    impl EnvVar<String> for ApiToken {
        const NAME: &'static str = "KOMENTAR_CLASSIFIER_TOKEN";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME).or_else(|_| env::var("HF_TOKEN")) {
                Ok(value) => Self::parse(&value),
                Err(_) => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Required environment variable not set".to_string(),
                }),
            }
        }
        const DESCRIPTION: &'static str = "Inference API token (falls back to HF_TOKEN)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// Request timeout
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "KOMENTAR_CLASSIFIER_TIMEOUT";
        const DEFAULT: Option<Duration> = None;
        const DESCRIPTION: &'static str = "Inference request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_positive_usize(value, Self::NAME, 1, 600).map(|secs| Duration::from_secs(secs as u64))
        }
    }
}

/// Batch processing variables
pub mod batch {
    use super::*;

    /// Comments per chunk
    pub struct ChunkSize;
    impl EnvVar<usize> for ChunkSize {
        const NAME: &'static str = "KOMENTAR_CHUNK_SIZE";
        const DEFAULT: Option<usize> = None;
        const DESCRIPTION: &'static str = "Comments processed per progress step";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 64)
        }
    }
}

/// Video comment feed variables
pub mod youtube {
    use super::*;

    /// Data API key
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "YOUTUBE_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "YouTube Data API v3 key";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }
}

/// Helpers
pub fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_http_url(value: &str, var_name: &str) -> EnvResult<String> {
    let url = value.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(EnvError {
            variable: var_name.to_string(),
            message: "URL must start with http:// or https://".to_string(),
        })
    }
}

fn parse_non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(EnvError {
            variable: var_name.to_string(),
            message: "Value must not be empty".to_string(),
        })
    } else {
        Ok(value.to_string())
    }
}

/// Markdown listing of every variable, printed by the `env` command
pub fn generate_env_docs() -> String {
    let rows = [
        (core::LogLevel::NAME, core::LogLevel::DESCRIPTION),
        (lexicon::Dataset::NAME, lexicon::Dataset::DESCRIPTION),
        (lexicon::Offline::NAME, lexicon::Offline::DESCRIPTION),
        (lexicon::File::NAME, lexicon::File::DESCRIPTION),
        (classifier::ApiUrl::NAME, classifier::ApiUrl::DESCRIPTION),
        (classifier::ApiToken::NAME, classifier::ApiToken::DESCRIPTION),
        (classifier::Timeout::NAME, classifier::Timeout::DESCRIPTION),
        (batch::ChunkSize::NAME, batch::ChunkSize::DESCRIPTION),
        (youtube::ApiKey::NAME, youtube::ApiKey::DESCRIPTION),
    ];

    let mut docs = String::from("# Environment Variables\n\n");
    for (name, description) in rows {
        docs.push_str(&format!("- `{}`: {}\n", name, description));
    }
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(core::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert_eq!(core::LogLevel::parse(" warn ").unwrap(), "warn");
        assert!(core::LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn test_boolean_parsing() {
        assert!(lexicon::Offline::parse("true").unwrap());
        assert!(lexicon::Offline::parse("1").unwrap());
        assert!(lexicon::Offline::parse("YES").unwrap());
        assert!(!lexicon::Offline::parse("off").unwrap());
        assert!(!lexicon::Offline::parse("0").unwrap());
        assert!(lexicon::Offline::parse("maybe").is_err());
    }

    #[test]
    fn test_dataset_validation() {
        assert!(lexicon::Dataset::parse("zeroix07/indo-slang-words").is_ok());
        assert!(lexicon::Dataset::parse("indo-slang-words").is_err());
        assert!(lexicon::Dataset::parse("/indo-slang-words").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(classifier::ApiUrl::parse("http://localhost:8080/predict").is_ok());
        assert!(classifier::ApiUrl::parse("https://api-inference.huggingface.co/models/x").is_ok());
        assert!(classifier::ApiUrl::parse("ftp://example.com").is_err());
    }

    #[test]
    fn test_numeric_validation() {
        assert_eq!(batch::ChunkSize::parse("10").unwrap(), 10);
        assert!(batch::ChunkSize::parse("0").is_err());
        assert!(batch::ChunkSize::parse("500").is_err());
        assert_eq!(
            classifier::Timeout::parse("45").unwrap(),
            Duration::from_secs(45)
        );
    }

    #[test]
    fn test_unset_variable_without_default_is_error() {
        env::remove_var("KOMENTAR_LEXICON_FILE");
        let err = lexicon::File::get().unwrap_err();
        assert_eq!(err.variable, "KOMENTAR_LEXICON_FILE");
    }

    #[test]
    fn test_env_docs_list_every_variable() {
        let docs = generate_env_docs();
        assert!(docs.contains("KOMENTAR_CHUNK_SIZE"));
        assert!(docs.contains("YOUTUBE_API_KEY"));
    }
}
