//! Configuration
//!
//! File, `.env` and environment-variable layering for the lexicon source, the
//! classifier endpoint, batch sizing and the video comment feed.

pub mod manager;

pub use manager::{
    AppConfig, BatchConfig, ClassifierConfig, ConfigManager, LexiconConfig, YouTubeConfig,
};

/// Configuration constants
pub mod constants {
    use std::time::Duration;

    // Slang dataset
    pub const DEFAULT_DATASET: &str = "zeroix07/indo-slang-words";
    pub const DEFAULT_DATASET_SPLIT: &str = "train";
    pub const DEFAULT_DATASET_CONFIG: &str = "default";
    pub const DEFAULT_ROWS_ENDPOINT: &str = "https://datasets-server.huggingface.co/rows";
    /// The rows endpoint refuses pages longer than this
    pub const MAX_ROWS_PAGE_SIZE: usize = 100;
    pub const DEFAULT_MAX_PAGES: usize = 200;
    pub const DEFAULT_LEXICON_TIMEOUT: Duration = Duration::from_secs(20);

    // Classifier
    pub const DEFAULT_MODEL: &str = "fhru/indobert-komentarbersih";
    pub const DEFAULT_INFERENCE_BASE: &str = "https://api-inference.huggingface.co/models";
    pub const DEFAULT_CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(60);

    // Batching
    pub const DEFAULT_CHUNK_SIZE: usize = 10;
    pub const MAX_CHUNK_SIZE: usize = 64;
    pub const DEFAULT_DEDUP_CACHE_SIZE: usize = 1024;

    // Video comment feed
    pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
    pub const DEFAULT_MAX_COMMENTS: usize = 100;
    /// commentThreads caps maxResults at this value
    pub const MAX_COMMENTS_PER_PAGE: usize = 100;
    pub const PAGE_DELAY: Duration = Duration::from_millis(100);
    pub const YOUTUBE_TIMEOUT: Duration = Duration::from_secs(20);

    pub const USER_AGENT: &str = concat!("komentarbersih/", env!("CARGO_PKG_VERSION"));

    // Config file search paths
    pub const CONFIG_PATHS: &[&str] = &[
        "komentarbersih.toml",
        ".komentarbersih.toml",
        "komentarbersih.json",
        "~/.config/komentarbersih/config.toml",
        "/etc/komentarbersih/config.toml",
    ];

    pub const ENV_FILES: &[&str] = &[".env.local", ".env"];
}
