//! Comment sources
//!
//! Everything that produces raw comments for the pipeline: uploaded files and
//! the public video comment feed. Only `text` is ever normalized; the other
//! fields are carried through for display.

pub mod file;
pub mod youtube;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::cleaning::value_to_text;
use crate::error::KomentarResult;

pub use file::FileCommentSource;
pub use youtube::{extract_video_id, VideoInfo, YouTubeClient, YouTubeCommentSource};

/// One comment as delivered by a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub author: String,
    /// Missing, `null` or non-string text is read as its string form
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl RawComment {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

/// Supplier of raw comments
pub trait CommentSource {
    /// Human-readable origin, used in logs and reports
    fn describe(&self) -> String;

    /// Reads up to `limit` comments, or all of them when `None`
    fn fetch(&self, limit: Option<usize>) -> KomentarResult<Vec<RawComment>>;
}

/// Borrowed texts of `comments`, in order
pub fn comment_texts(comments: &[RawComment]) -> Vec<&str> {
    comments.iter().map(|c| c.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_comment_tolerates_odd_text() {
        let comments: Vec<RawComment> = serde_json::from_str(
            r#"[
                {"author": "a", "text": "halo", "like_count": 3, "published_at": "2024-05-01T10:00:00Z"},
                {"author": "b", "text": null},
                {"text": 123},
                {}
            ]"#,
        )
        .unwrap();

        assert_eq!(comment_texts(&comments), vec!["halo", "", "123", ""]);
        assert_eq!(comments[0].like_count, 3);
        assert!(comments[0].published_at.is_some());
        assert!(comments[1].published_at.is_none());
    }
}
