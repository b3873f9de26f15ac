//! Uploaded comment files
//!
//! Format is picked by extension:
//!
//! - `.json`: array of strings, or of objects holding the comment in a text
//!   column
//! - `.jsonl` / `.ndjson`: one JSON value per line
//! - `.csv`: header row plus one comment per record
//! - anything else: one comment per non-empty line
//!
//! Without an explicit column name the first of [`COMMENT_COLUMNS`] present
//! is used. Rows whose text is missing or `null` are kept with empty text.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{CommentSource, RawComment};
use crate::cleaning::value_to_text;
use crate::error::{KomentarError, KomentarResult};

/// Column names searched for the comment text, in order
pub const COMMENT_COLUMNS: &[&str] = &["komentar", "comment", "text", "teks"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    JsonLines,
    Csv,
    Text,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("json") => FileFormat::Json,
            Some("jsonl") | Some("ndjson") => FileFormat::JsonLines,
            Some("csv") => FileFormat::Csv,
            _ => FileFormat::Text,
        }
    }
}

pub struct FileCommentSource {
    path: PathBuf,
    field: Option<String>,
    format: FileFormat,
}

impl FileCommentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = FileFormat::from_path(&path);
        Self {
            path,
            field: None,
            format,
        }
    }

    /// Reads the comment from this column instead of auto-detecting it
    pub fn with_field(mut self, field: Option<String>) -> Self {
        self.field = field;
        self
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    fn read(&self) -> KomentarResult<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            KomentarError::CommentSource(format!("cannot read {}: {}", self.path.display(), e))
        })
    }

    fn parse(&self, content: &str) -> KomentarResult<Vec<RawComment>> {
        match self.format {
            FileFormat::Json => {
                let value: Value = serde_json::from_str(content).map_err(|e| {
                    KomentarError::CommentSource(format!("{}: {}", self.path.display(), e))
                })?;

                match value {
                    Value::Array(items) => {
                        Ok(items.iter().map(|v| self.comment_from_value(v)).collect())
                    }
                    other => Err(KomentarError::CommentSource(format!(
                        "{}: expected a JSON array, found {}",
                        self.path.display(),
                        json_kind(&other)
                    ))),
                }
            }
            FileFormat::JsonLines => Ok(content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| match serde_json::from_str::<Value>(line) {
                    Ok(value) => self.comment_from_value(&value),
                    Err(_) => RawComment::from_text(line.trim()),
                })
                .collect()),
            FileFormat::Csv => self.parse_csv(content),
            FileFormat::Text => Ok(content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(RawComment::from_text)
                .collect()),
        }
    }

    fn comment_from_value(&self, value: &Value) -> RawComment {
        match value {
            Value::Object(map) => comment_from_object(map, self.field.as_deref()),
            other => RawComment::from_text(value_to_text(other)),
        }
    }

    fn parse_csv(&self, content: &str) -> KomentarResult<Vec<RawComment>> {
        let mut records = parse_csv_records(content).into_iter();
        let header = records.next().unwrap_or_default();
        let columns: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

        let text_column = match &self.field {
            Some(field) => columns.iter().position(|c| c == &field.to_lowercase()),
            None => COMMENT_COLUMNS
                .iter()
                .find_map(|name| columns.iter().position(|c| c == name)),
        }
        .ok_or_else(|| {
            KomentarError::CommentSource(format!(
                "{}: no comment column found; available columns: {}",
                self.path.display(),
                columns.join(", ")
            ))
        })?;

        let author_column = columns.iter().position(|c| c == "author");

        Ok(records
            .filter(|record| !(record.len() == 1 && record[0].is_empty()))
            .map(|record| RawComment {
                author: author_column
                    .and_then(|i| record.get(i))
                    .cloned()
                    .unwrap_or_default(),
                text: record.get(text_column).cloned().unwrap_or_default(),
                ..RawComment::default()
            })
            .collect())
    }
}

impl CommentSource for FileCommentSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self, limit: Option<usize>) -> KomentarResult<Vec<RawComment>> {
        let content = self.read()?;
        let mut comments = self.parse(&content)?;

        if let Some(limit) = limit {
            comments.truncate(limit);
        }

        tracing::info!(
            "Read {} comments from {} ({:?})",
            comments.len(),
            self.path.display(),
            self.format
        );
        Ok(comments)
    }
}

fn comment_from_object(map: &Map<String, Value>, field: Option<&str>) -> RawComment {
    let text = match field {
        Some(field) => map.get(field),
        None => COMMENT_COLUMNS.iter().find_map(|name| map.get(*name)),
    }
    .map(value_to_text)
    .unwrap_or_default();

    RawComment {
        author: map
            .get("author")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        text,
        like_count: map.get("like_count").and_then(Value::as_u64).unwrap_or(0),
        published_at: map
            .get("published_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Splits CSV content into records of fields
///
/// Handles quoted fields with embedded commas, doubled quotes and line
/// breaks. Both `\n` and `\r\n` end a record.
pub fn parse_csv_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}
