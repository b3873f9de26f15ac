//! Chunked batch analysis
//!
//! Cleans every text, then classifies the cleaned texts, both in sequential
//! chunks. Chunks only bound the size of each classifier request and drive
//! progress reporting; nothing runs in parallel.

use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;
use serde::Serialize;

use crate::classifier::{ClassificationAdapter, Label, Prediction};
use crate::cleaning::{CleanedText, Pipeline};
use crate::config::{constants, BatchConfig};
use crate::error::KomentarResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStage {
    Cleaning,
    Classification,
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStage::Cleaning => f.write_str("cleaning"),
            BatchStage::Classification => f.write_str("classification"),
        }
    }
}

/// Reported after every finished chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub stage: BatchStage,
    /// 1-based index of the chunk just finished
    pub chunk: usize,
    pub total_chunks: usize,
    pub processed: usize,
    pub total: usize,
}

impl BatchProgress {
    /// Completion of the current stage in `[0, 1]`
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f32 / self.total as f32
        }
    }
}

/// Result for one input comment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentAnalysis {
    pub original: String,
    pub cleaned: CleanedText,
    pub prediction: Prediction,
}

/// Aggregate counts over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub gambling: usize,
    pub normal: usize,
    /// Comments that were empty after cleaning
    pub empty: usize,
    pub gambling_ratio: f32,
    pub normal_ratio: f32,
    /// Mean confidence over non-empty comments
    pub average_confidence: f32,
}

impl BatchSummary {
    pub fn from_results(results: &[CommentAnalysis]) -> Self {
        let total = results.len();
        let gambling = results
            .iter()
            .filter(|r| r.prediction.label == Label::Gambling)
            .count();
        let empty = results.iter().filter(|r| r.cleaned.is_empty()).count();

        let scored: Vec<f32> = results
            .iter()
            .filter(|r| !r.cleaned.is_empty())
            .map(|r| r.prediction.confidence)
            .collect();
        let average_confidence = if scored.is_empty() {
            0.0
        } else {
            scored.iter().sum::<f32>() / scored.len() as f32
        };

        let ratio = |n: usize| if total == 0 { 0.0 } else { n as f32 / total as f32 };

        Self {
            total,
            gambling,
            normal: total - gambling,
            empty,
            gambling_ratio: ratio(gambling),
            normal_ratio: ratio(total - gambling),
            average_confidence,
        }
    }
}

/// Sequential chunk runner
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    chunk_size: usize,
    dedup_cache_size: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new(constants::DEFAULT_CHUNK_SIZE)
    }
}

impl BatchProcessor {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.clamp(1, constants::MAX_CHUNK_SIZE),
            dedup_cache_size: constants::DEFAULT_DEDUP_CACHE_SIZE,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(config.chunk_size).with_dedup_cache(config.dedup_cache_size)
    }

    /// Entries kept for reusing the cleaned form of repeated texts; 0 disables
    pub fn with_dedup_cache(mut self, size: usize) -> Self {
        self.dedup_cache_size = size;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn total_chunks(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Cleaning stage only; output is aligned with `texts`
    pub fn clean<S, F>(&self, pipeline: &Pipeline, texts: &[S], mut progress: F) -> Vec<CleanedText>
    where
        S: AsRef<str>,
        F: FnMut(&BatchProgress),
    {
        let total = texts.len();
        let total_chunks = self.total_chunks(total);
        let mut cache = NonZeroUsize::new(self.dedup_cache_size).map(LruCache::new);
        let mut cleaned = Vec::with_capacity(total);
        let mut reused = 0usize;

        for (index, chunk) in texts.chunks(self.chunk_size).enumerate() {
            for text in chunk {
                let text = text.as_ref();
                let result = match cache.as_mut() {
                    Some(cache) => match cache.get(text) {
                        Some(hit) => {
                            reused += 1;
                            CleanedText::clone(hit)
                        }
                        None => {
                            let fresh = pipeline.normalize(text);
                            cache.put(text.to_string(), fresh.clone());
                            fresh
                        }
                    },
                    None => pipeline.normalize(text),
                };
                cleaned.push(result);
            }

            let report = BatchProgress {
                stage: BatchStage::Cleaning,
                chunk: index + 1,
                total_chunks,
                processed: cleaned.len(),
                total,
            };
            tracing::debug!(
                "Cleaned chunk {}/{} ({} texts)",
                report.chunk,
                total_chunks,
                report.processed
            );
            progress(&report);
        }

        if reused > 0 {
            tracing::debug!("Reused cleaned output for {} repeated texts", reused);
        }

        cleaned
    }

    /// Classification stage only; output is aligned with `cleaned`
    pub fn classify<F>(
        &self,
        adapter: &ClassificationAdapter,
        cleaned: &[CleanedText],
        mut progress: F,
    ) -> KomentarResult<Vec<Prediction>>
    where
        F: FnMut(&BatchProgress),
    {
        adapter.ensure_ready()?;

        let total = cleaned.len();
        let total_chunks = self.total_chunks(total);
        let mut predictions = Vec::with_capacity(total);

        for (index, chunk) in cleaned.chunks(self.chunk_size).enumerate() {
            predictions.extend(adapter.classify_batch(chunk)?);

            let report = BatchProgress {
                stage: BatchStage::Classification,
                chunk: index + 1,
                total_chunks,
                processed: predictions.len(),
                total,
            };
            tracing::debug!(
                "Classified chunk {}/{} ({} texts)",
                report.chunk,
                total_chunks,
                report.processed
            );
            progress(&report);
        }

        Ok(predictions)
    }

    /// Cleans then classifies; one [`CommentAnalysis`] per input, in order
    pub fn run<S, F>(
        &self,
        pipeline: &Pipeline,
        adapter: &ClassificationAdapter,
        texts: &[S],
        mut progress: F,
    ) -> KomentarResult<Vec<CommentAnalysis>>
    where
        S: AsRef<str>,
        F: FnMut(&BatchProgress),
    {
        // Fail before spending time on cleaning
        adapter.ensure_ready()?;

        let cleaned = self.clean(pipeline, texts, &mut progress);
        let predictions = self.classify(adapter, &cleaned, &mut progress)?;

        Ok(texts
            .iter()
            .zip(cleaned)
            .zip(predictions)
            .map(|((original, cleaned), prediction)| CommentAnalysis {
                original: original.as_ref().to_string(),
                cleaned,
                prediction,
            })
            .collect())
    }
}
