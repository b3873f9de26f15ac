// Shared integration test helpers
//
// Fake lexicon sources and classifiers so no test touches the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use komentarbersih::classifier::{Classifier, Label, ModelInfo, Prediction};
use komentarbersih::cleaning::Pipeline;
use komentarbersih::config::AppConfig;
use komentarbersih::core::AppContext;
use komentarbersih::error::{KomentarError, KomentarResult};
use komentarbersih::lexicon::{LexiconSource, LexiconStore};

/// Lexicon source that always fails the way an unreachable dataset does
pub struct FailingLexiconSource {
    pub calls: Arc<AtomicUsize>,
}

impl FailingLexiconSource {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl LexiconSource for FailingLexiconSource {
    fn describe(&self) -> String {
        "unreachable dataset".to_string()
    }

    fn fetch_records(&self) -> KomentarResult<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(KomentarError::Http {
            status: 404,
            url: "https://datasets-server.invalid/rows".to_string(),
        })
    }
}

/// Lexicon source serving fixed records
pub struct StaticLexiconSource {
    pub records: Vec<Value>,
}

impl StaticLexiconSource {
    /// A slice of the real dataset plus malformed rows
    pub fn sample() -> Self {
        Self {
            records: vec![
                json!({"text": "mksh:terima kasih"}),
                json!({"text": "bgt:banget sekali"}),
                json!({"text": "gacor:sedang sering menang"}),
                json!({"text": "ngga:tidak"}),
                json!({"text": "tanpa titik dua"}),
                json!({"text": ":kosong"}),
                json!({"slang": "bukan text"}),
                json!(null),
            ],
        }
    }
}

impl LexiconSource for StaticLexiconSource {
    fn describe(&self) -> String {
        "static records".to_string()
    }

    fn fetch_records(&self) -> KomentarResult<Vec<Value>> {
        Ok(self.records.clone())
    }
}

/// How the fake classifier misbehaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    None,
    /// Inference fails for any batch containing this marker text
    ItemFailure,
    /// warm_up fails
    Unavailable,
    /// warm_up succeeds, every inference request fails
    AlwaysFailing,
}

pub const FAILING_MARKER: &str = "rusak";

/// Keyword classifier: gambling vocabulary → class 1
pub struct KeywordClassifier {
    pub requests: Arc<AtomicUsize>,
    pub mode: FailureMode,
}

impl KeywordClassifier {
    pub fn new(mode: FailureMode) -> Self {
        Self {
            requests: Arc::new(AtomicUsize::new(0)),
            mode,
        }
    }
}

const GAMBLING_WORDS: &[&str] = &["judi", "jackpot", "deposit", "gacor", "maxwin", "slot"];

impl Classifier for KeywordClassifier {
    fn warm_up(&self) -> KomentarResult<()> {
        match self.mode {
            FailureMode::Unavailable => Err(KomentarError::ClassifierUnavailable(
                "model failed to load".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn classify_batch(&self, texts: &[&str]) -> KomentarResult<Vec<Prediction>> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        match self.mode {
            FailureMode::ItemFailure if texts.iter().any(|t| t.contains(FAILING_MARKER)) => {
                return Err(KomentarError::Inference("input rejected".to_string()));
            }
            FailureMode::AlwaysFailing => {
                return Err(KomentarError::Inference("HTTP 500".to_string()));
            }
            _ => {}
        }

        Ok(texts
            .iter()
            .map(|text| {
                if GAMBLING_WORDS.iter().any(|w| text.contains(w)) {
                    Prediction::new(Label::Gambling, 0.95)
                } else {
                    Prediction::new(Label::Normal, 0.85)
                }
            })
            .collect())
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_name: "keyword-test".to_string(),
            labels: vec!["Komentar Normal".to_string(), "Komentar Judi".to_string()],
            backend: "in-process".to_string(),
        }
    }
}

/// Context with an offline lexicon and a fake classifier
pub struct TestEnvironment {
    pub ctx: AppContext,
    pub requests: Arc<AtomicUsize>,
}

impl TestEnvironment {
    pub fn new(mode: FailureMode) -> Self {
        Self::with_store(LexiconStore::offline(), mode)
    }

    pub fn with_store(store: LexiconStore, mode: FailureMode) -> Self {
        let classifier = KeywordClassifier::new(mode);
        let requests = classifier.requests.clone();

        let mut config = AppConfig::default();
        config.lexicon.offline = true;
        config.batch.chunk_size = 4;

        Self {
            ctx: AppContext::with_parts(config, Arc::new(store), Box::new(classifier)),
            requests,
        }
    }

    pub fn default() -> Self {
        Self::new(FailureMode::None)
    }

    pub fn pipeline(&self) -> &Pipeline {
        self.ctx.pipeline()
    }
}

/// Realistic comment fixtures
pub struct TestDataGenerator;

impl TestDataGenerator {
    pub fn spam_comments() -> Vec<&'static str> {
        vec![
            "JUDOL terpercaya!!! depo 10rb jadi 1jt 🔥🔥🔥 cek bio",
            "s l o t g a c o r hari ini, langsung wd",
            "Mau jp? gas ke situs sebelah @admin_gacor #maxwin",
            "Ｐｒｏｍｏ depo 25 ribu bonus 100%",
            "mekswin terusss bossku https://bit.ly/xyz",
        ]
    }

    pub fn normal_comments() -> Vec<&'static str> {
        vec![
            "makan siang enak sekali",
            "Videonya bagus bgt, makasih kak 🙏",
            "kl bisa bahas topik lain dong",
            "wkwkwk lucu bangettt",
            "mantap, sukses selalu",
        ]
    }

    /// Inputs that must never break the pipeline
    pub fn edge_cases() -> Vec<String> {
        vec![
            String::new(),
            "   ".to_string(),
            "\n\t\r".to_string(),
            "🔥🔥🔥".to_string(),
            "12345 678".to_string(),
            "!!!???...".to_string(),
            "https://only-a-link.example".to_string(),
            "@someone #tag".to_string(),
            "ä".repeat(500),
            "a".repeat(10_000),
            "\u{0000}\u{200B}\u{FEFF}".to_string(),
            "日本語のコメント".to_string(),
        ]
    }

    pub fn mixed_comments(count: usize) -> Vec<String> {
        let spam = Self::spam_comments();
        let normal = Self::normal_comments();
        (0..count)
            .map(|i| {
                if i % 3 == 0 {
                    spam[i % spam.len()].to_string()
                } else {
                    normal[i % normal.len()].to_string()
                }
            })
            .collect()
    }
}

/// Timing helpers
pub struct PerformanceHelper;

impl PerformanceHelper {
    pub fn measure_time<F, R>(f: F) -> (R, Duration)
    where
        F: FnOnce() -> R,
    {
        let start = std::time::Instant::now();
        let result = f();
        (result, start.elapsed())
    }

    pub fn assert_performance<F, R>(f: F, max_duration: Duration, description: &str) -> R
    where
        F: FnOnce() -> R,
    {
        let (result, duration) = Self::measure_time(f);
        assert!(
            duration <= max_duration,
            "{} took {:?}, expected <= {:?}",
            description,
            duration,
            max_duration
        );
        result
    }
}

/// Assertions on the cleaned-text contract
pub struct AssertionHelper;

impl AssertionHelper {
    pub fn assert_cleaned_contract(cleaned: &str, input: &str) {
        assert!(cleaned.is_ascii(), "non-ASCII output for {:?}: {:?}", input, cleaned);
        assert_eq!(cleaned, cleaned.trim(), "untrimmed output for {:?}", input);
        assert!(!cleaned.contains("  "), "double space in output for {:?}", input);
        assert!(!cleaned.contains("http"), "URL survived for {:?}", input);
        assert!(
            !cleaned.chars().any(|c| c.is_ascii_uppercase()),
            "uppercase in output for {:?}: {:?}",
            input,
            cleaned
        );
        assert!(
            cleaned
                .split(' ')
                .all(|token| token.is_empty() || !token.chars().all(|c| c.is_ascii_digit())),
            "standalone number in output for {:?}: {:?}",
            input,
            cleaned
        );
    }

    pub fn assert_size_in_range<T>(items: &[T], min: usize, max: usize, description: &str) {
        assert!(
            items.len() >= min && items.len() <= max,
            "{} size {} not in [{}, {}]",
            description,
            items.len(),
            min,
            max
        );
    }
}
