//! Classification adapter
//!
//! Wraps a [`Classifier`] backend and enforces the result contract callers
//! rely on:
//!
//! - empty text is never sent to the model and gets a neutral result
//! - a failure on one item neutralises that item only, with a warning
//! - the backend being unavailable as a whole is returned as
//!   [`KomentarError::ClassifierUnavailable`] so the caller can stop

pub mod http;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{KomentarError, KomentarResult};
pub use http::HttpClassifier;

/// Two-valued classifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Normal,
    Gambling,
}

impl Label {
    pub fn from_index(index: u8) -> Self {
        if index == 1 {
            Label::Gambling
        } else {
            Label::Normal
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Label::Normal => 0,
            Label::Gambling => 1,
        }
    }

    /// Text shown to users
    pub fn display_name(self) -> &'static str {
        match self {
            Label::Normal => "Komentar Normal",
            Label::Gambling => "Komentar Judi",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Result for one comment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    pub class_index: u8,
    /// Probability of `label`, in `[0, 1]`
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: Label, confidence: f32) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            label,
            class_index: label.index(),
            confidence,
        }
    }

    /// Class 0 with zero confidence
    pub fn neutral() -> Self {
        Self::new(Label::Normal, 0.0)
    }

    /// Picks the highest of per-class scores; index 1 is gambling
    pub fn from_scores(scores: &[f32]) -> Self {
        let best = scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_finite())
            .fold(None, |best: Option<(usize, f32)>, (i, &s)| match best {
                Some((_, top)) if top >= s => best,
                _ => Some((i, s)),
            });

        match best {
            Some((index, score)) => Self::new(Label::from_index(index as u8), score),
            None => Self::neutral(),
        }
    }

    pub fn is_gambling(&self) -> bool {
        self.label == Label::Gambling
    }
}

/// Static description of the backing model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub labels: Vec<String>,
    /// Where inference runs, e.g. the endpoint host
    pub backend: String,
}

/// Sequence-classification backend
pub trait Classifier: Send + Sync {
    /// Prepares the model; an error here means no request can succeed
    fn warm_up(&self) -> KomentarResult<()>;

    /// One prediction per input, in order
    fn classify_batch(&self, texts: &[&str]) -> KomentarResult<Vec<Prediction>>;

    fn info(&self) -> ModelInfo;
}

/// Counters for one adapter
#[derive(Debug, Default)]
pub struct AdapterStats {
    classified: AtomicUsize,
    skipped_empty: AtomicUsize,
    neutralised: AtomicUsize,
    batch_retries: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdapterStatsSnapshot {
    pub classified: usize,
    pub skipped_empty: usize,
    pub neutralised: usize,
    pub batch_retries: usize,
}

impl AdapterStats {
    pub fn snapshot(&self) -> AdapterStatsSnapshot {
        AdapterStatsSnapshot {
            classified: self.classified.load(Ordering::Relaxed),
            skipped_empty: self.skipped_empty.load(Ordering::Relaxed),
            neutralised: self.neutralised.load(Ordering::Relaxed),
            batch_retries: self.batch_retries.load(Ordering::Relaxed),
        }
    }

    fn add(counter: &AtomicUsize, n: usize) {
        counter.fetch_add(n, Ordering::Relaxed);
    }
}

/// Contract-enforcing front of a [`Classifier`]
pub struct ClassificationAdapter {
    backend: Box<dyn Classifier>,
    ready: OnceLock<()>,
    stats: AdapterStats,
}

impl ClassificationAdapter {
    pub fn new(backend: Box<dyn Classifier>) -> Self {
        Self {
            backend,
            ready: OnceLock::new(),
            stats: AdapterStats::default(),
        }
    }

    /// Warms the backend up once; later calls are free after a success
    pub fn ensure_ready(&self) -> KomentarResult<()> {
        if self.ready.get().is_some() {
            return Ok(());
        }

        self.backend.warm_up().map_err(into_unavailable)?;
        let _ = self.ready.set(());

        let info = self.backend.info();
        tracing::info!("Classifier ready: {} ({})", info.model_name, info.backend);
        Ok(())
    }

    pub fn info(&self) -> ModelInfo {
        self.backend.info()
    }

    pub fn stats(&self) -> AdapterStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn classify(&self, text: &str) -> KomentarResult<Prediction> {
        let mut predictions = self.classify_batch(&[text])?;
        Ok(predictions.pop().unwrap_or_else(Prediction::neutral))
    }

    /// One prediction per input; never shorter or reordered
    pub fn classify_batch<S: AsRef<str>>(&self, texts: &[S]) -> KomentarResult<Vec<Prediction>> {
        self.ensure_ready()?;

        let mut results = vec![Prediction::neutral(); texts.len()];
        let pending: Vec<(usize, &str)> = texts
            .iter()
            .map(|t| t.as_ref())
            .enumerate()
            .filter(|(_, t)| !t.trim().is_empty())
            .collect();

        AdapterStats::add(&self.stats.skipped_empty, texts.len() - pending.len());
        if pending.is_empty() {
            return Ok(results);
        }

        let inputs: Vec<&str> = pending.iter().map(|(_, t)| *t).collect();

        match self.backend.classify_batch(&inputs) {
            Ok(predictions) if predictions.len() == inputs.len() => {
                for ((index, _), prediction) in pending.iter().zip(predictions) {
                    results[*index] = prediction;
                }
                AdapterStats::add(&self.stats.classified, inputs.len());
            }
            Err(e) if is_unavailable(&e) => return Err(into_unavailable(e)),
            // nothing to narrow down: the single item is the failure
            Ok(predictions) if inputs.len() == 1 => {
                self.neutralise(pending[0].0, &format!("{} results", predictions.len()));
            }
            Err(e) if inputs.len() == 1 => self.neutralise(pending[0].0, &e.to_string()),
            Ok(predictions) => {
                tracing::warn!(
                    "Classifier returned {} results for {} inputs, retrying item by item",
                    predictions.len(),
                    inputs.len()
                );
                self.classify_each(&pending, &mut results)?;
            }
            Err(e) => {
                tracing::warn!("Batch inference failed, retrying item by item: {}", e);
                self.classify_each(&pending, &mut results)?;
            }
        }

        Ok(results)
    }

    /// Retries a failed chunk one item at a time
    ///
    /// When every item fails again the backend is treated as unavailable
    /// rather than answering the whole chunk with neutral predictions.
    fn classify_each(
        &self,
        pending: &[(usize, &str)],
        results: &mut [Prediction],
    ) -> KomentarResult<()> {
        AdapterStats::add(&self.stats.batch_retries, 1);
        let mut last_failure = None;
        let mut failed = 0;

        for (index, text) in pending {
            let failure = match self.backend.classify_batch(&[*text]) {
                Ok(mut predictions) if predictions.len() == 1 => {
                    results[*index] = predictions.remove(0);
                    AdapterStats::add(&self.stats.classified, 1);
                    continue;
                }
                Ok(predictions) => format!("classifier returned {} results", predictions.len()),
                Err(e) if is_unavailable(&e) => return Err(into_unavailable(e)),
                Err(e) => e.to_string(),
            };

            self.neutralise(*index, &failure);
            failed += 1;
            last_failure = Some(failure);
        }

        match last_failure {
            Some(failure) if failed == pending.len() => {
                Err(KomentarError::ClassifierUnavailable(format!(
                    "all {} comments in the chunk failed, last error: {}",
                    failed, failure
                )))
            }
            _ => Ok(()),
        }
    }

    fn neutralise(&self, index: usize, reason: &str) {
        tracing::warn!("Item {} neutralised: {}", index, reason);
        AdapterStats::add(&self.stats.neutralised, 1);
    }
}

impl fmt::Debug for ClassificationAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationAdapter")
            .field("model", &self.backend.info().model_name)
            .field("ready", &self.ready.get().is_some())
            .finish()
    }
}

fn is_unavailable(error: &KomentarError) -> bool {
    matches!(error, KomentarError::ClassifierUnavailable(_))
}

fn into_unavailable(error: KomentarError) -> KomentarError {
    match error {
        KomentarError::ClassifierUnavailable(_) => error,
        other => KomentarError::ClassifierUnavailable(other.to_string()),
    }
}
