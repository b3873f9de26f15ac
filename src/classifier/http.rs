//! Hosted inference backend
//!
//! Talks to a Hugging Face style text-classification endpoint:
//!
//! ```text
//! POST {endpoint}
//! {"inputs": ["..."], "options": {"wait_for_model": true}}
//!
//! [[{"label": "LABEL_0", "score": 0.97}, {"label": "LABEL_1", "score": 0.03}], ...]
//! ```

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{Classifier, ModelInfo, Prediction};
use crate::config::ClassifierConfig;
use crate::error::{KomentarError, KomentarResult};
use crate::lexicon::remote::build_client;

const WARM_UP_INPUT: &str = "halo";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a [&'a str],
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Batched endpoints answer with one list per input; some answer a single
/// input with a flat list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<Vec<LabelScore>>),
    Single(Vec<LabelScore>),
}

pub struct HttpClassifier {
    client: Client,
    endpoint: String,
    model: String,
    token: Option<String>,
    wait_for_model: bool,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> KomentarResult<Self> {
        Ok(Self {
            client: build_client(config.timeout())?,
            endpoint: config.endpoint(),
            model: config.model.clone(),
            token: config.api_token.clone(),
            wait_for_model: config.wait_for_model,
        })
    }

    fn post(&self, texts: &[&str]) -> KomentarResult<Vec<Vec<LabelScore>>> {
        let body = InferenceRequest {
            inputs: texts,
            options: InferenceOptions {
                wait_for_model: self.wait_for_model,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, &self.endpoint));
        }

        let decoded: InferenceResponse = response
            .json()
            .map_err(|e| KomentarError::Inference(format!("undecodable response: {}", e)))?;

        Ok(match decoded {
            InferenceResponse::Batch(rows) => rows,
            InferenceResponse::Single(row) => vec![row],
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> KomentarError {
        if error.is_connect() {
            KomentarError::ClassifierUnavailable(format!(
                "cannot reach {}: {}",
                self.endpoint, error
            ))
        } else if error.is_timeout() {
            KomentarError::ClassifierUnavailable(format!(
                "{} timed out: {}",
                self.endpoint, error
            ))
        } else {
            KomentarError::Inference(error.to_string())
        }
    }
}

impl Classifier for HttpClassifier {
    fn warm_up(&self) -> KomentarResult<()> {
        tracing::debug!("Warming up classifier at {}", self.endpoint);
        self.post(&[WARM_UP_INPUT]).map(|_| ())
    }

    fn classify_batch(&self, texts: &[&str]) -> KomentarResult<Vec<Prediction>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self.post(texts)?;
        if rows.len() != texts.len() {
            return Err(KomentarError::Inference(format!(
                "expected {} results, got {}",
                texts.len(),
                rows.len()
            )));
        }

        Ok(rows.iter().map(|row| prediction_from_row(row)).collect())
    }

    fn info(&self) -> ModelInfo {
        let backend = url::Url::parse(&self.endpoint)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.endpoint.clone());

        ModelInfo {
            model_name: self.model.clone(),
            labels: vec![
                super::Label::Normal.display_name().to_string(),
                super::Label::Gambling.display_name().to_string(),
            ],
            backend,
        }
    }
}

/// Maps a non-success status to unavailable (nothing will work) or a
/// per-request failure
pub(crate) fn status_error(status: StatusCode, url: &str) -> KomentarError {
    match status.as_u16() {
        401 | 403 | 404 | 503 => KomentarError::ClassifierUnavailable(format!(
            "HTTP {} from {}",
            status.as_u16(),
            url
        )),
        code => KomentarError::Inference(format!("HTTP {} from {}", code, url)),
    }
}

/// Class index for a model label, if it names one of the two classes
pub(crate) fn label_index(label: &str) -> Option<usize> {
    match label.trim().to_lowercase().as_str() {
        "label_0" | "0" | "komentar normal" | "normal" => Some(0),
        "label_1" | "1" | "komentar judi" | "judi" | "gambling" => Some(1),
        _ => None,
    }
}

/// Builds a prediction from the score list of one input
///
/// When only the top label is returned the other class gets the remainder.
pub(crate) fn prediction_from_row(row: &[LabelScore]) -> Prediction {
    let mut scores: [Option<f32>; 2] = [None, None];

    for entry in row {
        if let Some(index) = label_index(&entry.label) {
            scores[index] = Some(entry.score);
        }
    }

    let scores = match scores {
        [Some(normal), Some(gambling)] => [normal, gambling],
        [Some(normal), None] => [normal, (1.0 - normal).max(0.0)],
        [None, Some(gambling)] => [(1.0 - gambling).max(0.0), gambling],
        [None, None] => return Prediction::neutral(),
    };

    Prediction::from_scores(&scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Label;

    fn row(json: &str) -> Vec<LabelScore> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_label_index() {
        assert_eq!(label_index("LABEL_1"), Some(1));
        assert_eq!(label_index("Komentar Judi"), Some(1));
        assert_eq!(label_index("1"), Some(1));
        assert_eq!(label_index("LABEL_0"), Some(0));
        assert_eq!(label_index("positive"), None);
    }

    #[test]
    fn test_prediction_from_full_row() {
        let p = prediction_from_row(&row(
            r#"[{"label": "LABEL_1", "score": 0.93}, {"label": "LABEL_0", "score": 0.07}]"#,
        ));
        assert_eq!(p.label, Label::Gambling);
        assert!((p.confidence - 0.93).abs() < 1e-6);
    }

    #[test]
    fn test_prediction_from_top_label_only() {
        let p = prediction_from_row(&row(r#"[{"label": "LABEL_1", "score": 0.3}]"#));
        assert_eq!(p.label, Label::Normal);
        assert!((p.confidence - 0.7).abs() < 1e-6);

        let p = prediction_from_row(&row(r#"[{"label": "unknown", "score": 0.9}]"#));
        assert_eq!(p, Prediction::neutral());
    }

    #[test]
    fn test_response_shapes() {
        let batch: InferenceResponse =
            serde_json::from_str(r#"[[{"label": "LABEL_0", "score": 0.9}]]"#).unwrap();
        assert!(matches!(batch, InferenceResponse::Batch(rows) if rows.len() == 1));

        let single: InferenceResponse =
            serde_json::from_str(r#"[{"label": "LABEL_0", "score": 0.9}]"#).unwrap();
        assert!(matches!(single, InferenceResponse::Single(row) if row.len() == 1));
    }

    #[test]
    fn test_status_mapping() {
        let url = "https://example.test/models/m";
        assert!(status_error(StatusCode::SERVICE_UNAVAILABLE, url).is_fatal());
        assert!(status_error(StatusCode::UNAUTHORIZED, url).is_fatal());
        assert!(!status_error(StatusCode::BAD_REQUEST, url).is_fatal());
        assert!(!status_error(StatusCode::TOO_MANY_REQUESTS, url).is_fatal());
    }

    #[test]
    fn test_request_body() {
        let body = InferenceRequest {
            inputs: &["a", "b"],
            options: InferenceOptions {
                wait_for_model: true,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"inputs": ["a", "b"], "options": {"wait_for_model": true}})
        );
    }

    #[test]
    fn test_info_reports_host() {
        let classifier = HttpClassifier::new(&ClassifierConfig::default()).unwrap();
        let info = classifier.info();
        assert_eq!(info.model_name, "fhru/indobert-komentarbersih");
        assert_eq!(info.backend, "api-inference.huggingface.co");
        assert_eq!(info.labels.len(), 2);
    }
}
