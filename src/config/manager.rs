//! Configuration manager
//!
//! Unified configuration: config file, `.env`, environment variables and
//! defaults, in increasing order of precedence.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::error::{helpers::config_error, KomentarError, KomentarResult};

/// Where the slang dataset comes from
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Use only the built-in table
    pub offline: bool,
    /// Local JSON / JSON-lines mirror; takes precedence over the dataset server
    pub file: Option<String>,
    pub dataset: String,
    pub dataset_config: String,
    pub split: String,
    pub rows_endpoint: String,
    pub page_size: usize,
    pub max_pages: usize,
    pub timeout_secs: u64,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            offline: false,
            file: None,
            dataset: constants::DEFAULT_DATASET.to_string(),
            dataset_config: constants::DEFAULT_DATASET_CONFIG.to_string(),
            split: constants::DEFAULT_DATASET_SPLIT.to_string(),
            rows_endpoint: constants::DEFAULT_ROWS_ENDPOINT.to_string(),
            page_size: constants::MAX_ROWS_PAGE_SIZE,
            max_pages: constants::DEFAULT_MAX_PAGES,
            timeout_secs: constants::DEFAULT_LEXICON_TIMEOUT.as_secs(),
        }
    }
}

impl LexiconConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Remote inference endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub model: String,
    /// Full endpoint URL; derived from `model` when absent
    pub api_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    /// Ask the endpoint to block until the model is loaded
    pub wait_for_model: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: constants::DEFAULT_MODEL.to_string(),
            api_url: None,
            api_token: None,
            timeout_secs: constants::DEFAULT_CLASSIFIER_TIMEOUT.as_secs(),
            wait_for_model: true,
        }
    }
}

impl ClassifierConfig {
    pub fn endpoint(&self) -> String {
        match &self.api_url {
            Some(url) => url.clone(),
            None => format!("{}/{}", constants::DEFAULT_INFERENCE_BASE, self.model),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Chunked batch processing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    pub chunk_size: usize,
    /// Entries kept for reusing cleaned output of repeated comments; 0 disables
    pub dedup_cache_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: constants::DEFAULT_CHUNK_SIZE,
            dedup_cache_size: constants::DEFAULT_DEDUP_CACHE_SIZE,
        }
    }
}

/// Video comment feed
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct YouTubeConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_base: String,
    pub max_comments: usize,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: constants::DEFAULT_YOUTUBE_API_BASE.to_string(),
            max_comments: constants::DEFAULT_MAX_COMMENTS,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub lexicon: LexiconConfig,
    pub classifier: ClassifierConfig,
    pub batch: BatchConfig,
    pub youtube: YouTubeConfig,
}

impl AppConfig {
    /// Validates ranges and URLs
    pub fn validate(&self) -> KomentarResult<()> {
        if self.batch.chunk_size == 0 || self.batch.chunk_size > constants::MAX_CHUNK_SIZE {
            return Err(config_error(format!(
                "batch.chunk_size must be between 1 and {}",
                constants::MAX_CHUNK_SIZE
            )));
        }

        if self.lexicon.page_size == 0 || self.lexicon.page_size > constants::MAX_ROWS_PAGE_SIZE {
            return Err(config_error(format!(
                "lexicon.page_size must be between 1 and {}",
                constants::MAX_ROWS_PAGE_SIZE
            )));
        }

        if self.lexicon.timeout_secs == 0 || self.classifier.timeout_secs == 0 {
            return Err(config_error("timeouts must be greater than 0"));
        }

        if !self.lexicon.offline && self.lexicon.file.is_none() {
            check_http_url("lexicon.rows_endpoint", &self.lexicon.rows_endpoint)?;
            if self.lexicon.dataset.trim().is_empty() {
                return Err(config_error("lexicon.dataset must not be empty"));
            }
        }

        check_http_url("classifier endpoint", &self.classifier.endpoint())?;
        check_http_url("youtube.api_base", &self.youtube.api_base)?;

        Ok(())
    }

    /// Applies environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{batch, classifier, lexicon, youtube, EnvVar};

        if let Ok(offline) = lexicon::Offline::get() {
            self.lexicon.offline = offline;
        }

        if let Ok(dataset) = lexicon::Dataset::get() {
            self.lexicon.dataset = dataset;
        }

        if let Ok(file) = lexicon::File::get() {
            self.lexicon.file = Some(file);
        }

        if let Ok(api_url) = classifier::ApiUrl::get() {
            tracing::info!("Classifier endpoint overridden by environment: {}", api_url);
            self.classifier.api_url = Some(api_url);
        }

        if let Ok(token) = classifier::ApiToken::get() {
            self.classifier.api_token = Some(token);
        }

        if let Ok(timeout) = classifier::Timeout::get() {
            self.classifier.timeout_secs = timeout.as_secs();
        }

        if let Ok(chunk_size) = batch::ChunkSize::get() {
            self.batch.chunk_size = chunk_size;
        }

        if let Ok(api_key) = youtube::ApiKey::get() {
            self.youtube.api_key = Some(api_key);
        }
    }
}

fn check_http_url(field: &str, value: &str) -> KomentarResult<()> {
    match url::Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(config_error(format!("{} is not an http(s) URL: '{}'", field, value))),
    }
}

/// Configuration manager
pub struct ConfigManager {
    config: AppConfig,
    source: Option<String>,
}

impl ConfigManager {
    /// Searches the default locations
    pub fn new() -> KomentarResult<Self> {
        Self::load_dotenv();

        let mut source = None;
        let mut config = AppConfig::default();

        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("Loading config file: {}", expanded_path);
                config = Self::load_from_file(&expanded_path)?;
                source = Some(expanded_path.into_owned());
                break;
            }
        }

        if source.is_none() {
            tracing::debug!("No config file found, using defaults");
        }

        Self::finish(config, source)
    }

    /// Loads an explicitly named file
    pub fn from_file(path: &str) -> KomentarResult<Self> {
        Self::load_dotenv();

        let expanded_path = shellexpand::tilde(path).into_owned();
        let config = Self::load_from_file(&expanded_path)?;
        Self::finish(config, Some(expanded_path))
    }

    fn finish(mut config: AppConfig, source: Option<String>) -> KomentarResult<Self> {
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config, source })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Path of the file the configuration came from, if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load_from_file(path: &str) -> KomentarResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KomentarError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;

        if path.ends_with(".json") {
            serde_json::from_str(&content).map_err(|e| {
                KomentarError::Config(format!("Failed to parse JSON config {}: {}", path, e))
            })
        } else {
            toml::from_str(&content).map_err(|e| {
                KomentarError::Config(format!("Failed to parse TOML config {}: {}", path, e))
            })
        }
    }

    fn load_dotenv() {
        for env_file in constants::ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::debug!("Loaded environment file: {}", env_file);
                break;
            }
        }
    }

    /// Writes an example configuration with every default filled in
    pub fn generate_example_config(path: &str) -> KomentarResult<()> {
        let content = toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| KomentarError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| KomentarError::Config(format!("Failed to write {}: {}", path, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch.chunk_size, 10);
        assert_eq!(
            config.classifier.endpoint(),
            "https://api-inference.huggingface.co/models/fhru/indobert-komentarbersih"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [batch]
            chunk_size = 16

            [lexicon]
            offline = true
            "#,
        )
        .unwrap();

        assert_eq!(config.batch.chunk_size, 16);
        assert!(config.lexicon.offline);
        assert_eq!(config.lexicon.dataset, constants::DEFAULT_DATASET);
        assert_eq!(config.youtube.max_comments, constants::DEFAULT_MAX_COMMENTS);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.batch.chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.lexicon.page_size = 500;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.classifier.api_url = Some("localhost:8080".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("komentarbersih.toml");
        let path = path.to_str().unwrap();

        ConfigManager::generate_example_config(path).unwrap();
        let manager = ConfigManager::from_file(path).unwrap();
        assert_eq!(manager.source(), Some(path));
        assert_eq!(manager.config().lexicon.page_size, constants::MAX_ROWS_PAGE_SIZE);
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let mut config = AppConfig::default();
        config.classifier.api_token = Some("hf_secret".to_string());
        config.youtube.api_key = Some("AIza-secret".to_string());

        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(!rendered.contains("hf_secret"));
        assert!(!rendered.contains("AIza-secret"));
    }
}
