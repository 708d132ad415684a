//! Gemini `generateContent` client.
//!
//! One client serves both the image model and the text model; the model name
//! is part of the request path.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use easel_core::{ApiKey, UpstreamErrorKind};
use serde::Deserialize;
use serde_json::json;

use super::generation::{
    Candidate, GenerationError, ImageGenerator, InlineImage, Part, PromptEnhancer,
};
use super::prompt::enhancement_instruction;

#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// Scheme and host, e.g. `https://generativelanguage.googleapis.com`
    pub api_base: String,
    pub image_model: String,
    pub text_model: String,
    /// Whole-request timeout; `None` keeps reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

/// HTTP client for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    config: GeminiClientConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .context("Failed to create HTTP client for Gemini API")?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model
        )
    }

    /// Single `generateContent` call with a one-part text prompt.
    #[tracing::instrument(skip(self, api_key, model, prompt), fields(model = %model, prompt_len = prompt.len()))]
    async fn generate_content(
        &self,
        api_key: &ApiKey,
        model: &str,
        prompt: &str,
    ) -> Result<Vec<Candidate>, GenerationError> {
        let request_body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key.expose())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini request could not be sent");
                GenerationError::other(format!("Request to Gemini API failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error = classify_failure(status.as_u16(), &error_text);
            tracing::warn!(
                status = status.as_u16(),
                kind = %error.kind,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Gemini API request failed"
            );
            return Err(error);
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            GenerationError::other(format!("Failed to parse Gemini API response: {}", e))
        })?;

        let candidates = body.into_candidates()?;

        tracing::debug!(
            candidates = candidates.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Gemini API request succeeded"
        );

        Ok(candidates)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(
        &self,
        api_key: &ApiKey,
        prompt: &str,
    ) -> Result<Vec<Candidate>, GenerationError> {
        self.generate_content(api_key, &self.config.image_model, prompt)
            .await
    }
}

#[async_trait]
impl PromptEnhancer for GeminiClient {
    async fn enhance(&self, api_key: &ApiKey, prompt: &str) -> Result<String, GenerationError> {
        let instruction = enhancement_instruction(prompt);
        let candidates = self
            .generate_content(api_key, &self.config.text_model, &instruction)
            .await?;

        let text: String = candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .parts
                    .into_iter()
                    .filter_map(|part| match part {
                        Part::Text(text) => Some(text),
                        Part::InlineImage(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(text.trim().to_string())
    }
}

/// Map a non-success response to a typed error.
///
/// Uses the HTTP status and, when the body is a Google error envelope, its
/// `status` field and `details[].reason`.
fn classify_failure(http_status: u16, body: &str) -> GenerationError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error);

    let api_status = envelope
        .as_ref()
        .and_then(|e| e.status.as_deref())
        .unwrap_or_default();
    let key_invalid = envelope
        .as_ref()
        .map(|e| {
            e.details
                .iter()
                .any(|d| d.reason.as_deref() == Some("API_KEY_INVALID"))
        })
        .unwrap_or(false)
        || body.contains("API_KEY_INVALID");

    let kind = match (http_status, api_status) {
        (401 | 403, _) | (_, "UNAUTHENTICATED" | "PERMISSION_DENIED") => {
            UpstreamErrorKind::AuthFailure
        }
        (400, _) if key_invalid => UpstreamErrorKind::AuthFailure,
        (429, _) | (_, "RESOURCE_EXHAUSTED") => UpstreamErrorKind::QuotaExceeded,
        _ => UpstreamErrorKind::Other,
    };

    let message = match envelope.and_then(|e| e.message) {
        Some(message) if !message.is_empty() => message,
        _ if body.trim().is_empty() => format!("Gemini API returned status {}", http_status),
        _ => format!("Gemini API returned status {}: {}", http_status, body.trim()),
    };

    GenerationError::new(kind, message)
}

// --- Gemini API wire types ---

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireContent>,
}

#[derive(Debug, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<WireInlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<WireErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

impl GenerateContentResponse {
    /// Decode base64 payloads. Parts with neither text nor data are dropped.
    fn into_candidates(self) -> Result<Vec<Candidate>, GenerationError> {
        self.candidates
            .into_iter()
            .map(|candidate| {
                let wire_parts = candidate.content.map(|c| c.parts).unwrap_or_default();
                let mut parts = Vec::with_capacity(wire_parts.len());
                for part in wire_parts {
                    match (part.inline_data, part.text) {
                        (Some(inline), _) if !inline.data.is_empty() => {
                            let data = base64::engine::general_purpose::STANDARD
                                .decode(inline.data.as_bytes())
                                .map_err(|e| {
                                    GenerationError::other(format!(
                                        "Failed to decode image data: {}",
                                        e
                                    ))
                                })?;
                            parts.push(Part::InlineImage(InlineImage {
                                mime_type: inline
                                    .mime_type
                                    .filter(|m| !m.is_empty())
                                    .unwrap_or_else(|| "image/png".to_string()),
                                data,
                            }));
                        }
                        (_, Some(text)) => parts.push(Part::Text(text)),
                        _ => {}
                    }
                }
                Ok(Candidate { parts })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const MODEL_PATH: &str = "/v1beta/models/image-model:generateContent";
    const TEXT_PATH: &str = "/v1beta/models/text-model:generateContent";

    fn client(base: &str) -> GeminiClient {
        GeminiClient::new(GeminiClientConfig {
            api_base: base.to_string(),
            image_model: "image-model".to_string(),
            text_model: "text-model".to_string(),
            timeout: None,
        })
        .unwrap()
    }

    fn key() -> ApiKey {
        ApiKey::new("test-key")
    }

    #[tokio::test]
    async fn test_generate_decodes_inline_data() {
        let mut server = mockito::Server::new_async().await;
        let encoded = base64::engine::general_purpose::STANDARD.encode([0x89, b'P', b'N', b'G']);
        let mock = server
            .mock("POST", MODEL_PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "parts": [{ "text": "a bowl of pho" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": { "parts": [
                            { "text": "Here is your image" },
                            { "inlineData": { "mimeType": "image/png", "data": encoded } }
                        ]}
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let candidates = client(&server.url())
            .generate(&key(), "a bowl of pho")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].parts[1],
            Part::InlineImage(InlineImage {
                mime_type: "image/png".to_string(),
                data: vec![0x89, b'P', b'N', b'G'],
            })
        );
    }

    #[tokio::test]
    async fn test_generate_tolerates_missing_candidates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", MODEL_PATH)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let candidates = client(&server.url())
            .generate(&key(), "anything")
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_generate_rejects_undecodable_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", MODEL_PATH)
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{ "content": { "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "!!not base64!!" } }
                    ]}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = client(&server.url())
            .generate(&key(), "anything")
            .await
            .unwrap_err();
        assert_eq!(err.kind, UpstreamErrorKind::Other);
    }

    #[tokio::test]
    async fn test_auth_failure_is_typed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", MODEL_PATH)
            .with_status(400)
            .with_body(
                json!({
                    "error": {
                        "code": 400,
                        "message": "API key not valid. Please pass a valid API key.",
                        "status": "INVALID_ARGUMENT",
                        "details": [{ "reason": "API_KEY_INVALID" }]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = client(&server.url())
            .generate(&key(), "anything")
            .await
            .unwrap_err();
        assert_eq!(err.kind, UpstreamErrorKind::AuthFailure);
        assert_eq!(err.message, "API key not valid. Please pass a valid API key.");
    }

    #[tokio::test]
    async fn test_quota_failure_is_typed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", TEXT_PATH)
            .with_status(429)
            .with_body(
                json!({
                    "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = client(&server.url())
            .enhance(&key(), "soup")
            .await
            .unwrap_err();
        assert_eq!(err.kind, UpstreamErrorKind::QuotaExceeded);
    }

    #[tokio::test]
    async fn test_server_error_is_other() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", MODEL_PATH)
            .with_status(503)
            .with_body("upstream connect error")
            .create_async()
            .await;

        let err = client(&server.url())
            .generate(&key(), "anything")
            .await
            .unwrap_err();
        assert_eq!(err.kind, UpstreamErrorKind::Other);
        assert!(err.message.contains("503"));
        assert!(err.message.contains("upstream connect error"));
    }

    #[tokio::test]
    async fn test_enhance_concatenates_first_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", TEXT_PATH)
            .match_body(Matcher::Regex("Original prompt: \\\\\"tacos\\\\\"".to_string()))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [
                        { "content": { "parts": [
                            { "text": "  Overhead shot of three street tacos, " },
                            { "text": "warm light.\n" }
                        ]}},
                        { "content": { "parts": [{ "text": "ignored" }] } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let enhanced = client(&server.url())
            .enhance(&key(), "tacos")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(enhanced, "Overhead shot of three street tacos, warm light.");
    }

    #[tokio::test]
    async fn test_transport_failure_is_other() {
        // Nothing listens on port 9 on the loopback interface.
        let err = client("http://127.0.0.1:9")
            .generate(&key(), "anything")
            .await
            .unwrap_err();
        assert_eq!(err.kind, UpstreamErrorKind::Other);
    }

    #[test]
    fn test_classify_failure() {
        assert_eq!(classify_failure(401, "").kind, UpstreamErrorKind::AuthFailure);
        assert_eq!(classify_failure(403, "").kind, UpstreamErrorKind::AuthFailure);
        assert_eq!(classify_failure(429, "").kind, UpstreamErrorKind::QuotaExceeded);
        assert_eq!(classify_failure(400, "bad request").kind, UpstreamErrorKind::Other);
        assert_eq!(classify_failure(500, "").kind, UpstreamErrorKind::Other);
        assert_eq!(
            classify_failure(400, r#"{"error":{"status":"PERMISSION_DENIED","message":"no"}}"#)
                .kind,
            UpstreamErrorKind::AuthFailure
        );
        assert_eq!(
            classify_failure(500, "").message,
            "Gemini API returned status 500"
        );
    }
}
