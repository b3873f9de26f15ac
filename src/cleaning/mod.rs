//! Comment normalization pipeline
//!
//! Turns noisy, informally written Indonesian comments into the canonical form
//! the classifier was trained on:
//!
//! 1. [`normalizer::unicode_fold`]
//! 2. [`normalizer::clean`]: lowercase, emoji, URLs, mentions, symbols,
//!    numbers, whitespace, elongated letters
//! 3. [`normalizer::despace`]: `"j u d i"` → `"judi"`
//! 4. [`substitution::substitute`] against the lazily built lexicon
//!
//! Normalization never fails. Empty, whitespace-only and missing input all
//! become the empty string, and batch output is always aligned with its input.

pub mod normalizer;
pub mod substitution;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lexicon::{Lexicon, LexiconStore};

/// Output of [`Pipeline::normalize`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanedText(String);

impl CleanedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for CleanedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CleanedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CleanedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for CleanedText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CleanedText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Anything a comment source may hand over in place of a string
pub trait CommentText {
    fn to_comment_text(&self) -> String;
}

impl CommentText for str {
    fn to_comment_text(&self) -> String {
        self.to_string()
    }
}

impl CommentText for String {
    fn to_comment_text(&self) -> String {
        self.clone()
    }
}

impl<T: CommentText + ?Sized> CommentText for &T {
    fn to_comment_text(&self) -> String {
        (**self).to_comment_text()
    }
}

impl<T: CommentText> CommentText for Option<T> {
    fn to_comment_text(&self) -> String {
        self.as_ref().map(T::to_comment_text).unwrap_or_default()
    }
}

impl CommentText for Value {
    fn to_comment_text(&self) -> String {
        value_to_text(self)
    }
}

macro_rules! comment_text_via_display {
    ($($ty:ty),*) => {
        $(
            impl CommentText for $ty {
                fn to_comment_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

comment_text_via_display!(bool, char, i32, i64, u32, u64, usize, f32, f64);

/// `null` → empty, strings as-is, anything else → its JSON text
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-text normalizer bound to one lexicon store
#[derive(Clone)]
pub struct Pipeline {
    lexicon: Arc<LexiconStore>,
}

impl Pipeline {
    pub fn new(lexicon: Arc<LexiconStore>) -> Self {
        Self { lexicon }
    }

    /// Pipeline over the built-in slang table only
    pub fn offline() -> Self {
        Self::new(Arc::new(LexiconStore::offline()))
    }

    /// The lexicon, built on first access
    pub fn lexicon(&self) -> &Lexicon {
        self.lexicon.lexicon()
    }

    pub fn store(&self) -> &Arc<LexiconStore> {
        &self.lexicon
    }

    pub fn normalize(&self, text: &str) -> CleanedText {
        if text.trim().is_empty() {
            return CleanedText::default();
        }

        let folded = normalizer::unicode_fold(text);
        let cleaned = normalizer::clean(&folded);
        if cleaned.is_empty() {
            return CleanedText::default();
        }

        let joined = normalizer::despace(&cleaned);
        let substituted = substitution::substitute(&joined, self.lexicon());

        CleanedText(substituted.trim().to_string())
    }

    /// Element-wise [`Pipeline::normalize`]; output has the input's length
    /// and order
    pub fn normalize_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<CleanedText> {
        texts.iter().map(|t| self.normalize(t.as_ref())).collect()
    }

    pub fn normalize_value(&self, value: &Value) -> CleanedText {
        self.normalize(&value_to_text(value))
    }

    pub fn normalize_values(&self, values: &[Value]) -> Vec<CleanedText> {
        values.iter().map(|v| self.normalize_value(v)).collect()
    }

    /// Normalizes anything convertible to comment text
    pub fn normalize_any<T: CommentText + ?Sized>(&self, input: &T) -> CleanedText {
        self.normalize(&input.to_comment_text())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("lexicon_built", &self.lexicon.is_built())
            .finish()
    }
}
