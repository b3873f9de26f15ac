//! Slang lexicon
//!
//! Maps informal Indonesian tokens to their formal form. The lexicon is the
//! merge of a remote `slang:formal` dataset and the built-in table in
//! [`manual`], with the built-in table winning on conflict.
//!
//! [`LexiconStore`] builds it at most once per store, even when several
//! threads ask for it at the same time, and never fails: when the remote
//! source is unusable it logs the reason and serves the built-in table alone.

pub mod manual;
pub mod remote;

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Instant;

use serde_json::Value;

use crate::cleaning::normalizer::is_word_char;
use crate::error::KomentarResult;
pub use remote::{source_from_config, DatasetRowsSource, FileSource, LexiconSource, NoRemote};

/// Immutable slang → formal mapping
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, String>,
    remote_entries: usize,
    manual_entries: usize,
    fallback: bool,
}

impl Lexicon {
    /// Built-in table only
    pub fn manual() -> Self {
        Self::merge(HashMap::new(), false)
    }

    /// Layers the built-in table over `remote`
    pub fn merge(remote: HashMap<String, String>, fallback: bool) -> Self {
        let remote_entries = remote.len();
        let mut entries = remote;

        for (slang, formal) in manual::MANUAL_ENTRIES {
            entries.insert((*slang).to_string(), (*formal).to_string());
        }

        Self {
            entries,
            remote_entries,
            manual_entries: manual::MANUAL_ENTRIES.len(),
            fallback,
        }
    }

    /// Builds from raw source records, skipping every malformed one
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let remote = records.into_iter().filter_map(parse_record).collect();
        Self::merge(remote, false)
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Usable pairs parsed from the remote source, before the merge
    pub fn remote_entries(&self) -> usize {
        self.remote_entries
    }

    pub fn manual_entries(&self) -> usize {
        self.manual_entries
    }

    /// True when the remote source failed and only the built-in table is used
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Extracts `(slang, formal)` from a `{"text": "slang:formal"}` record
pub fn parse_record(record: &Value) -> Option<(String, String)> {
    let text = record.get("text")?.as_str()?;
    parse_pair(text)
}

/// Splits on the first colon; both sides must be non-empty after trimming
///
/// The formal side is brought into cleaned-text form (lowercase, symbols
/// other than `-` dropped, single spaces) so substituted output stays stable
/// when normalized again.
pub fn parse_pair(text: &str) -> Option<(String, String)> {
    let (slang, formal) = text.trim().split_once(':')?;
    let slang = slang.trim();
    let formal = canonical_formal(formal);

    if slang.is_empty() || formal.is_empty() {
        return None;
    }

    Some((slang.to_lowercase(), formal))
}

fn canonical_formal(formal: &str) -> String {
    let kept: String = formal
        .to_lowercase()
        .chars()
        .map(|c| if is_word_char(c) || c == '-' { c } else { ' ' })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lazily built, process-lifetime lexicon
pub struct LexiconStore {
    source: Box<dyn LexiconSource>,
    lexicon: OnceLock<Lexicon>,
}

impl LexiconStore {
    pub fn new(source: Box<dyn LexiconSource>) -> Self {
        Self {
            source,
            lexicon: OnceLock::new(),
        }
    }

    /// Store that never touches the network
    pub fn offline() -> Self {
        Self::new(Box::new(NoRemote))
    }

    /// Returns the lexicon, building it on first use
    pub fn lexicon(&self) -> &Lexicon {
        self.lexicon.get_or_init(|| self.build())
    }

    pub fn is_built(&self) -> bool {
        self.lexicon.get().is_some()
    }

    fn build(&self) -> Lexicon {
        let started = Instant::now();
        tracing::info!("Loading slang lexicon from {}", self.source.describe());

        let lexicon = match self.load_remote() {
            Ok(remote) => Lexicon::merge(remote, false),
            Err(e) => {
                tracing::warn!(
                    "Slang dataset unavailable, using the built-in table only: {}",
                    e
                );
                Lexicon::merge(HashMap::new(), true)
            }
        };

        tracing::info!(
            "Loaded {} slang entries ({} remote, {} built-in) in {:.2}s",
            lexicon.len(),
            lexicon.remote_entries(),
            lexicon.manual_entries(),
            started.elapsed().as_secs_f32()
        );

        lexicon
    }

    fn load_remote(&self) -> KomentarResult<HashMap<String, String>> {
        let records = self.source.fetch_records()?;
        let total = records.len();

        let remote: HashMap<String, String> = records.iter().filter_map(parse_record).collect();

        if remote.is_empty() && !self.source.is_offline() {
            return Err(crate::error::KomentarError::LexiconSource(format!(
                "{} returned no usable slang pairs ({} records)",
                self.source.describe(),
                total
            )));
        }

        if remote.len() < total {
            tracing::debug!(
                "Skipped {} malformed slang records",
                total - remote.len()
            );
        }

        Ok(remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KomentarError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        records: Vec<Value>,
    }

    impl LexiconSource for CountingSource {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        fn fetch_records(&self) -> KomentarResult<Vec<Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }
    }

    struct BrokenSource;

    impl LexiconSource for BrokenSource {
        fn describe(&self) -> String {
            "broken".to_string()
        }

        fn fetch_records(&self) -> KomentarResult<Vec<Value>> {
            Err(KomentarError::Network("connection refused".to_string()))
        }
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair(" Otw : on the way "),
            Some(("otw".to_string(), "on the way".to_string()))
        );
        assert_eq!(
            parse_pair("jam:10:30"),
            Some(("jam".to_string(), "10 30".to_string()))
        );
        assert_eq!(
            parse_pair("Otw:On The Way!"),
            Some(("otw".to_string(), "on the way".to_string()))
        );
        assert_eq!(
            parse_pair("tmn2:Teman-Teman"),
            Some(("tmn2".to_string(), "teman-teman".to_string()))
        );
        assert_eq!(parse_pair("hmm:?!"), None);
        assert_eq!(parse_pair("no colon"), None);
        assert_eq!(parse_pair(":formal"), None);
        assert_eq!(parse_pair("slang:   "), None);
    }

    #[test]
    fn test_parse_record_skips_other_shapes() {
        assert!(parse_record(&json!({"text": "gws:gawat"})).is_some());
        assert!(parse_record(&json!({"text": 12})).is_none());
        assert!(parse_record(&json!({"slang": "gws"})).is_none());
        assert!(parse_record(&json!("gws:gawat")).is_none());
    }

    #[test]
    fn test_manual_entries_override_remote() {
        let records = vec![
            json!({"text": "yg:yg"}),
            json!({"text": "bgst:bagus sekali"}),
        ];
        let lexicon = Lexicon::from_records(&records);

        assert_eq!(lexicon.get("yg"), Some("yang"));
        assert_eq!(lexicon.get("bgst"), Some("bagus sekali"));
        assert_eq!(lexicon.remote_entries(), 2);
        assert!(!lexicon.is_fallback());
    }

    #[test]
    fn test_store_builds_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = LexiconStore::new(Box::new(CountingSource {
            calls: calls.clone(),
            records: vec![json!({"text": "mksh:terima kasih"})],
        }));

        assert!(!store.is_built());
        assert_eq!(store.lexicon().get("mksh"), Some("terima kasih"));
        assert_eq!(store.lexicon().len(), store.lexicon().len());
        assert!(store.is_built());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_store_builds_once_under_contention() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(LexiconStore::new(Box::new(CountingSource {
            calls: calls.clone(),
            records: vec![json!({"text": "mksh:terima kasih"})],
        })));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.lexicon().len())
            })
            .collect();

        let sizes: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(sizes.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_source_falls_back_to_manual_table() {
        let store = LexiconStore::new(Box::new(BrokenSource));
        let lexicon = store.lexicon();

        assert!(lexicon.is_fallback());
        assert_eq!(lexicon.len(), manual::MANUAL_ENTRIES.len());
        for (slang, formal) in manual::MANUAL_ENTRIES {
            assert_eq!(lexicon.get(slang), Some(*formal));
        }
    }

    #[test]
    fn test_source_without_usable_records_falls_back() {
        let store = LexiconStore::new(Box::new(CountingSource {
            calls: Arc::new(AtomicUsize::new(0)),
            records: vec![json!({"text": "no pairs here"}), json!(null)],
        }));
        assert!(store.lexicon().is_fallback());
    }

    #[test]
    fn test_offline_store_is_not_a_fallback() {
        let store = LexiconStore::offline();
        assert!(!store.lexicon().is_fallback());
        assert_eq!(store.lexicon().remote_entries(), 0);
        assert!(store.lexicon().contains("judol"));
    }
}
