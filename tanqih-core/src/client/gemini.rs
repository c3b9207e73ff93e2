//! Google Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::{BackendError, Generate};
use crate::error::{Result, TanqihError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Longest slice of an error body kept for the log.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Clone, Debug)]
pub struct GeminiParams {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiParams {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(params: GeminiParams) -> Result<Self> {
        if params.api_key.trim().is_empty() {
            return Err(TanqihError::MissingCredential(
                "Gemini API key is required".to_string(),
            ));
        }
        if params.model.trim().is_empty() {
            return Err(TanqihError::Config("model name must not be empty".into()));
        }
        let client = Client::builder()
            .timeout(params.timeout)
            .build()
            .map_err(|e| TanqihError::Client(e.to_string()))?;
        let endpoint = format!(
            "{}/{}:generateContent",
            params.base_url.trim_end_matches('/'),
            params.model
        );
        Ok(Self {
            api_key: params.api_key,
            model: params.model,
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn extract_text(response: GenerateResponse) -> String {
        let Some(candidate) = response.candidates.into_iter().next() else {
            if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
                warn!("Gemini blocked the prompt: {reason}");
            }
            return String::new();
        };
        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                debug!("Gemini finished with reason {reason}");
            }
        }
        candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Generate for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> std::result::Result<String, BackendError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        debug!(model = %self.model, bytes = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {e}");
                BackendError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LIMIT {
                let mut cut = ERROR_BODY_LIMIT;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(match status.as_u16() {
                401 | 403 => BackendError::Auth,
                429 => BackendError::RateLimited,
                code => BackendError::Status { code, body },
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(Self::extract_text(parsed))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_missing_credential() {
        let err = GeminiClient::new(GeminiParams::new("  ")).err().unwrap();
        assert!(matches!(err, TanqihError::MissingCredential(_)));
    }

    #[test]
    fn endpoint_includes_model() {
        let mut p = GeminiParams::new("k");
        p.base_url = "http://localhost:9/v1beta/models/".into();
        let c = GeminiClient::new(p).unwrap();
        assert_eq!(
            c.endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn parts_are_concatenated() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"أ"},{"text":"ب"}]},"finishReason":"STOP"}]}"#;
        let resp: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(GeminiClient::extract_text(resp), "أب");
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let raw = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let resp: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(GeminiClient::extract_text(resp), "");
    }
}
