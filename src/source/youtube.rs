//! Public video comment feed (YouTube Data API v3)

use std::sync::OnceLock;
use std::thread;

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{CommentSource, RawComment};
use crate::config::{constants, YouTubeConfig};
use crate::error::{helpers, KomentarError, KomentarResult};
use crate::lexicon::remote::build_client;

/// Video metadata shown next to the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub view_count: u64,
    pub comment_count: u64,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    channel_title: String,
}

/// The API encodes counters as strings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadPage {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    author_display_name: String,
    #[serde(default)]
    text_display: String,
    #[serde(default)]
    like_count: u64,
    published_at: Option<DateTime<Utc>>,
}

impl From<CommentSnippet> for RawComment {
    fn from(snippet: CommentSnippet) -> Self {
        RawComment {
            author: snippet.author_display_name,
            text: clean_html_text(&snippet.text_display),
            like_count: snippet.like_count,
            published_at: snippet.published_at,
        }
    }
}

/// Blocking client for the `videos` and `commentThreads` endpoints
pub struct YouTubeClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> KomentarResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                KomentarError::Config(
                    "YouTube API key not found; set YOUTUBE_API_KEY in the environment or .env"
                        .to_string(),
                )
            })?;

        Ok(Self {
            client: build_client(constants::YOUTUBE_TIMEOUT)?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn video_info(&self, video_id: &str) -> KomentarResult<VideoInfo> {
        let url = format!("{}/videos", self.api_base);
        let response: VideoListResponse = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet,statistics"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        let item = response.items.into_iter().next().ok_or_else(|| {
            KomentarError::CommentSource(format!("video {} not found", video_id))
        })?;

        Ok(VideoInfo {
            video_id: video_id.to_string(),
            title: item.snippet.title,
            channel: item.snippet.channel_title,
            view_count: parse_count(item.statistics.view_count.as_deref()),
            comment_count: parse_count(item.statistics.comment_count.as_deref()),
        })
    }

    /// Top-level comments by relevance, at most `max`
    ///
    /// A failure on the first page is returned; a failure on a later page
    /// ends the fetch with what was read so far.
    pub fn comments(&self, video_id: &str, max: usize) -> KomentarResult<Vec<RawComment>> {
        let mut comments: Vec<RawComment> = Vec::new();
        let mut page_token: Option<String> = None;

        while comments.len() < max {
            let wanted = (max - comments.len()).min(constants::MAX_COMMENTS_PER_PAGE);

            let page = match self.fetch_page(video_id, wanted, page_token.as_deref()) {
                Ok(page) => page,
                Err(e) if comments.is_empty() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Stopped fetching comments for {} after {}: {}",
                        video_id,
                        comments.len(),
                        e
                    );
                    break;
                }
            };

            comments.extend(
                page.items
                    .into_iter()
                    .map(|thread| RawComment::from(thread.snippet.top_level_comment.snippet)),
            );
            tracing::debug!("Fetched {} comments for {}", comments.len(), video_id);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }

            thread::sleep(constants::PAGE_DELAY);
        }

        comments.truncate(max);
        Ok(comments)
    }

    fn fetch_page(
        &self,
        video_id: &str,
        max_results: usize,
        page_token: Option<&str>,
    ) -> KomentarResult<CommentThreadPage> {
        let url = format!("{}/commentThreads", self.api_base);
        let max_results = max_results.to_string();

        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
            ("order", "relevance"),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        Ok(self
            .client
            .get(&url)
            .query(&query)
            .send()?
            .error_for_status()?
            .json()?)
    }
}

/// Comments of one video as a [`CommentSource`]
pub struct YouTubeCommentSource {
    client: YouTubeClient,
    video_id: String,
    default_max: usize,
}

impl YouTubeCommentSource {
    pub fn from_url(client: YouTubeClient, video_url: &str, default_max: usize) -> KomentarResult<Self> {
        let video_id = extract_video_id(video_url)
            .ok_or_else(|| helpers::validation_error(format!("not a YouTube video URL: {}", video_url)))?;

        Ok(Self {
            client,
            video_id,
            default_max,
        })
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn video_info(&self) -> KomentarResult<VideoInfo> {
        self.client.video_info(&self.video_id)
    }
}

impl CommentSource for YouTubeCommentSource {
    fn describe(&self) -> String {
        format!("youtube:{}", self.video_id)
    }

    fn fetch(&self, limit: Option<usize>) -> KomentarResult<Vec<RawComment>> {
        self.client
            .comments(&self.video_id, limit.unwrap_or(self.default_max))
    }
}

/// Video id from `watch?v=`, `youtu.be/`, `embed/`, `shorts/` and `live/`
/// links, with or without a scheme
pub fn extract_video_id(video_url: &str) -> Option<String> {
    let trimmed = video_url.trim();
    let parsed = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{}", trimmed)))
        .ok()?;

    let host = parsed.host_str()?.trim_start_matches("www.");
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

    let id = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            match segments.next() {
                Some("watch") => parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("embed") | Some("shorts") | Some("live") | Some("v") => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        }
        _ => None,
    }?;

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

/// Plain text from the API's HTML `textDisplay`
pub fn clean_html_text(text: &str) -> String {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();

    if text.is_empty() {
        return String::new();
    }

    let line_break = LINE_BREAK.get_or_init(|| html_pattern(r"<[bB][rR]\s*/?>"));
    let tag = TAG.get_or_init(|| html_pattern(r"<[^>]+>"));
    let whitespace = WHITESPACE.get_or_init(|| html_pattern(r"\s+"));

    let text = line_break.replace_all(text, " ");
    let text = tag.replace_all(&text, "");
    let text = unescape_entities(&text);
    whitespace.replace_all(&text, " ").trim().to_string()
}

fn html_pattern(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid HTML pattern {}: {}", pattern, e))
}

/// Decodes HTML character references in `textDisplay`
///
/// Covers the markup escapes, common typographic names (quotes, dashes,
/// ellipsis, guillemets, symbol marks) and every numeric form such as
/// `&#39;` or `&#x1F525;`. Unknown names are left as written.
fn unescape_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&candidate[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "hellip" => Some('…'),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        "lsquo" => Some('‘'),
        "rsquo" => Some('’'),
        "ldquo" => Some('“'),
        "rdquo" => Some('”'),
        "laquo" => Some('«'),
        "raquo" => Some('»'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        "trade" => Some('™'),
        "deg" => Some('°'),
        "middot" => Some('·'),
        "bull" => Some('•'),
        _ => {
            let digits = entity.strip_prefix('#')?;
            let code = match digits.strip_prefix(|c| c == 'x' || c == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let expected = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), expected);
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42"),
            expected
        );
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"), expected);
        assert_eq!(extract_video_id("youtube.com/embed/dQw4w9WgXcQ"), expected);
        assert_eq!(extract_video_id("https://m.youtube.com/shorts/dQw4w9WgXcQ"), expected);
    }

    #[test]
    fn test_extract_video_id_rejects_other_urls() {
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/channel/UC123"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_from_url_rejects_non_video_url() {
        let config = YouTubeConfig {
            api_key: Some("test-key".to_string()),
            ..YouTubeConfig::default()
        };
        let client = YouTubeClient::new(&config).unwrap();

        let err = YouTubeCommentSource::from_url(client, "https://example.com/x", 100)
            .err()
            .unwrap();
        assert!(matches!(err, KomentarError::InvalidInput(_)));
        assert!(err.to_string().contains("https://example.com/x"));
    }

    #[test]
    fn test_clean_html_text() {
        assert_eq!(
            clean_html_text("Gacor &amp; aman<br>cek <a href=\"https://x.co\">link</a>"),
            "Gacor & aman cek link"
        );
        assert_eq!(clean_html_text("&quot;depo&quot; &#39;50&#39;"), "\"depo\" '50'");
        assert_eq!(clean_html_text("  banyak \n\n spasi "), "banyak spasi");
        assert_eq!(
            clean_html_text("&ldquo;maxwin&rdquo; &ndash; cuma 5rb&hellip;"),
            "“maxwin” – cuma 5rb…"
        );
        assert_eq!(clean_html_text("&#x1F525; gacor&trade;"), "🔥 gacor™");
        assert_eq!(clean_html_text("AT&T &unknown;"), "AT&T &unknown;");
        assert_eq!(clean_html_text(""), "");
    }

    #[test]
    fn test_decode_comment_page() {
        let page: CommentThreadPage = serde_json::from_str(
            r#"{
                "nextPageToken": "QURTSl9p",
                "items": [{
                    "snippet": {
                        "topLevelComment": {
                            "snippet": {
                                "authorDisplayName": "@budi",
                                "textDisplay": "slot gacor &amp; jp",
                                "likeCount": 7,
                                "publishedAt": "2024-05-01T10:00:00Z"
                            }
                        }
                    }
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(page.next_page_token.as_deref(), Some("QURTSl9p"));
        let comment = RawComment::from(
            page.items
                .into_iter()
                .next()
                .unwrap()
                .snippet
                .top_level_comment
                .snippet,
        );
        assert_eq!(comment.author, "@budi");
        assert_eq!(comment.text, "slot gacor & jp");
        assert_eq!(comment.like_count, 7);
        assert!(comment.published_at.is_some());
    }

    #[test]
    fn test_decode_video_statistics() {
        let response: VideoListResponse = serde_json::from_str(
            r#"{"items": [{"snippet": {"title": "Vlog", "channelTitle": "Kanal"},
                "statistics": {"viewCount": "1200", "commentCount": "35"}}]}"#,
        )
        .unwrap();
        let item = &response.items[0];
        assert_eq!(item.snippet.channel_title, "Kanal");
        assert_eq!(parse_count(item.statistics.view_count.as_deref()), 1200);
        assert_eq!(parse_count(None), 0);
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = YouTubeConfig {
            api_key: None,
            ..YouTubeConfig::default()
        };
        assert!(matches!(
            YouTubeClient::new(&config),
            Err(KomentarError::Config(_))
        ));
    }
}
