//! # KomentarBersih
//!
//! Flags gambling-promotion spam in Indonesian social-media comments.
//!
//! ## Module layout
//!
//! - `lexicon` - slang → formal lexicon, loaded once with a built-in fallback
//! - `cleaning` - the normalization pipeline
//! - `classifier` - classification adapter and hosted inference backend
//! - `source` - comment files and the video comment feed
//! - `batch` - chunked clean + classify with progress reporting
//! - `core` - process context wiring everything together
//! - `config` / `env` - configuration layering
//! - `error` - error type shared by all of the above

pub mod batch;
pub mod classifier;
pub mod cleaning;
pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod lexicon;
pub mod source;

// Re-export commonly used items for convenience
pub use crate::batch::{BatchProcessor, BatchProgress, BatchStage, BatchSummary, CommentAnalysis};
pub use crate::classifier::{ClassificationAdapter, Classifier, Label, ModelInfo, Prediction};
pub use crate::cleaning::{CleanedText, CommentText, Pipeline};
pub use crate::config::{AppConfig, ConfigManager};
pub use crate::core::{AppContext, BatchReport};
pub use crate::error::{KomentarError, KomentarResult};
pub use crate::lexicon::{Lexicon, LexiconSource, LexiconStore};
pub use crate::source::{CommentSource, RawComment};
