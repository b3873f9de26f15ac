//! Process context
//!
//! [`AppContext`] is built once at startup and handed to every entry point.
//! It owns the lexicon store and the classification adapter, so "load once"
//! holds without any module-level state.

use std::sync::Arc;

use crate::batch::{BatchProcessor, BatchProgress, BatchSummary, CommentAnalysis};
use crate::classifier::{ClassificationAdapter, Classifier, HttpClassifier};
use crate::cleaning::Pipeline;
use crate::config::AppConfig;
use crate::error::KomentarResult;
use crate::lexicon::{source_from_config, LexiconStore};
use crate::source::{
    comment_texts, CommentSource, FileCommentSource, RawComment, VideoInfo, YouTubeClient,
    YouTubeCommentSource,
};

/// Output of a source-driven run
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchReport {
    /// Where the comments came from
    pub source: String,
    pub comments: Vec<RawComment>,
    pub results: Vec<CommentAnalysis>,
    pub summary: BatchSummary,
}

pub struct AppContext {
    config: AppConfig,
    pipeline: Pipeline,
    adapter: ClassificationAdapter,
    batch: BatchProcessor,
}

impl AppContext {
    /// Wires up the configured lexicon source and hosted classifier
    ///
    /// Nothing is fetched here: the lexicon is built on first use and the
    /// classifier is warmed up by the first classification.
    pub fn from_config(config: AppConfig) -> KomentarResult<Self> {
        let store = LexiconStore::new(source_from_config(&config.lexicon)?);
        let classifier = HttpClassifier::new(&config.classifier)?;
        Ok(Self::with_parts(config, Arc::new(store), Box::new(classifier)))
    }

    /// Context around explicit collaborators
    pub fn with_parts(
        config: AppConfig,
        store: Arc<LexiconStore>,
        classifier: Box<dyn Classifier>,
    ) -> Self {
        let batch = BatchProcessor::from_config(&config.batch);

        Self {
            pipeline: Pipeline::new(store),
            adapter: ClassificationAdapter::new(classifier),
            batch,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn adapter(&self) -> &ClassificationAdapter {
        &self.adapter
    }

    pub fn batch_processor(&self) -> &BatchProcessor {
        &self.batch
    }

    /// Cleans and classifies a single comment
    pub fn analyze_one(&self, text: &str) -> KomentarResult<CommentAnalysis> {
        let cleaned = self.pipeline.normalize(text);
        let prediction = self.adapter.classify(&cleaned)?;

        Ok(CommentAnalysis {
            original: text.to_string(),
            cleaned,
            prediction,
        })
    }

    pub fn analyze_batch<S, F>(&self, texts: &[S], progress: F) -> KomentarResult<Vec<CommentAnalysis>>
    where
        S: AsRef<str>,
        F: FnMut(&BatchProgress),
    {
        self.batch.run(&self.pipeline, &self.adapter, texts, progress)
    }

    /// Fetches from `source` and analyzes every comment it returns
    pub fn analyze_source<F>(
        &self,
        source: &dyn CommentSource,
        limit: Option<usize>,
        progress: F,
    ) -> KomentarResult<BatchReport>
    where
        F: FnMut(&BatchProgress),
    {
        let comments = source.fetch(limit)?;
        let texts = comment_texts(&comments);
        let results = self.analyze_batch(&texts, progress)?;
        let summary = BatchSummary::from_results(&results);

        tracing::info!(
            "Analyzed {} comments from {}: {} gambling, {} normal",
            summary.total,
            source.describe(),
            summary.gambling,
            summary.normal
        );

        Ok(BatchReport {
            source: source.describe(),
            comments,
            results,
            summary,
        })
    }

    pub fn file_source(&self, path: &str, field: Option<String>) -> FileCommentSource {
        FileCommentSource::new(path).with_field(field)
    }

    /// Source for a video link, plus its metadata
    pub fn youtube_source(&self, video_url: &str) -> KomentarResult<(YouTubeCommentSource, VideoInfo)> {
        let client = YouTubeClient::new(&self.config.youtube)?;
        let source =
            YouTubeCommentSource::from_url(client, video_url, self.config.youtube.max_comments)?;
        let info = source.video_info()?;
        Ok((source, info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Label, ModelInfo, Prediction};
    use crate::error::KomentarError;

    struct KeywordClassifier;

    impl Classifier for KeywordClassifier {
        fn warm_up(&self) -> KomentarResult<()> {
            Ok(())
        }

        fn classify_batch(&self, texts: &[&str]) -> KomentarResult<Vec<Prediction>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let label = if t.contains("judi") || t.contains("jackpot") {
                        Label::Gambling
                    } else {
                        Label::Normal
                    };
                    Prediction::new(label, 0.75)
                })
                .collect())
        }

        fn info(&self) -> ModelInfo {
            ModelInfo {
                model_name: "keyword".into(),
                labels: Vec::new(),
                backend: "test".into(),
            }
        }
    }

    fn context() -> AppContext {
        AppContext::with_parts(
            AppConfig::default(),
            Arc::new(LexiconStore::offline()),
            Box::new(KeywordClassifier),
        )
    }

    #[test]
    fn test_analyze_one() {
        let ctx = context();
        let analysis = ctx.analyze_one("JP terus bos!!! 🔥").unwrap();

        assert_eq!(analysis.cleaned, "jackpot terus bos");
        assert_eq!(analysis.prediction.label, Label::Gambling);
        assert_eq!(analysis.original, "JP terus bos!!! 🔥");
    }

    #[test]
    fn test_context_shares_one_lexicon() {
        let ctx = context();
        assert!(!ctx.pipeline().store().is_built());
        ctx.analyze_one("gk").unwrap();
        assert!(ctx.pipeline().store().is_built());
    }

    #[test]
    fn test_analyze_source_from_file() {
        let ctx = context();
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"judol gacor\nmakan siang\n").unwrap();

        let source = ctx.file_source(file.path().to_str().unwrap(), None);
        let report = ctx.analyze_source(&source, None, |_| {}).unwrap();

        assert_eq!(report.comments.len(), 2);
        assert_eq!(report.summary.gambling, 1);
        assert_eq!(report.results[1].cleaned, "makan siang");
    }

    #[test]
    fn test_youtube_source_needs_key() {
        let ctx = context();
        let err = ctx
            .youtube_source("https://youtu.be/dQw4w9WgXcQ")
            .err()
            .unwrap();
        assert!(matches!(err, KomentarError::Config(_)));
    }
}
