use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client as HttpClient, Response as HttpResponse};
use serde_json::{json, Map, Value};

use super::ImageProvider;
use crate::compiler::{GenerationRequest, GenerationResponse, InlineData, PromptPart, ResponsePart};
use crate::keys::{non_empty_env, ApiKey};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECONDS: f64 = 90.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub api_base: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl GeminiSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: model.into(),
            request_timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    /// `GEMINI_API_BASE` and `DREAMCANVAS_REQUEST_TIMEOUT` (seconds, 15–300)
    /// override the defaults.
    pub fn from_env(model: &str) -> Self {
        let mut settings = Self::new(model);
        if let Some(base) = non_empty_env("GEMINI_API_BASE") {
            settings.api_base = base.trim_end_matches('/').to_string();
        }
        settings.request_timeout =
            timeout_from_raw(non_empty_env("DREAMCANVAS_REQUEST_TIMEOUT").as_deref());
        settings
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

fn timeout_from_raw(raw: Option<&str>) -> Duration {
    let seconds = raw
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
        .clamp(15.0, 300.0);
    Duration::from_secs_f64(seconds)
}

pub struct GeminiProvider {
    settings: GeminiSettings,
    http: HttpClient,
}

impl GeminiProvider {
    pub fn new(settings: GeminiSettings) -> Self {
        Self {
            settings,
            http: HttpClient::new(),
        }
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    pub fn endpoint(&self) -> String {
        let trimmed = self.settings.model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.settings.api_base, model_path)
    }

    /// `generateContent` body for `request`; parts keep their compiled order.
    pub fn build_payload(request: &GenerationRequest) -> Value {
        let parts: Vec<Value> = request
            .parts
            .iter()
            .map(|part| match part {
                PromptPart::Text(text) => json!({ "text": text }),
                PromptPart::InlineData(inline) => json!({
                    "inlineData": {
                        "mimeType": inline.mime_type,
                        "data": inline.data,
                    }
                }),
            })
            .collect();

        json!({
            "contents": [{
                "role": "user",
                "parts": parts,
            }],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": {
                    "aspectRatio": request.aspect_ratio.as_str(),
                    "imageSize": request.image_size,
                },
            },
        })
    }

    /// Flattens the parts of every candidate, in order.
    pub fn parse_response(payload: &Value) -> GenerationResponse {
        let candidates = payload
            .get("candidates")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let parts = candidates
            .iter()
            .filter_map(|candidate| {
                candidate
                    .get("content")
                    .and_then(|content| content.get("parts"))
                    .and_then(Value::as_array)
            })
            .flatten()
            .map(parse_part)
            .collect();

        GenerationResponse { parts }
    }
}

fn parse_part(part: &Value) -> ResponsePart {
    let inline_data = part
        .get("inlineData")
        .or_else(|| part.get("inline_data"))
        .and_then(Value::as_object)
        .map(|inline: &Map<String, Value>| InlineData {
            mime_type: inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            data: inline
                .get("data")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
    ResponsePart {
        text: part.get("text").and_then(Value::as_str).map(str::to_string),
        inline_data,
    }
}

impl ImageProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate(&self, request: &GenerationRequest, key: &ApiKey) -> Result<GenerationResponse> {
        let endpoint = self.endpoint();
        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", key.expose())])
            .timeout(self.settings.request_timeout)
            .json(&Self::build_payload(request))
            .send()
            .with_context(|| format!("Gemini request failed ({endpoint})"))?;
        let payload = response_json_or_error("Gemini", response)?;
        Ok(Self::parse_response(&payload))
    }
}

fn response_json_or_error(provider: &str, response: HttpResponse) -> Result<Value> {
    let status = response.status();
    let code = status.as_u16();
    let body = response
        .text()
        .with_context(|| format!("{provider} response body read failed"))?;
    if !status.is_success() {
        bail!(
            "{provider} request failed ({code}): {}",
            truncate_text(&body, 512)
        );
    }
    serde_json::from_str(&body).with_context(|| format!("{provider} returned invalid JSON payload"))
}

fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}

#[cfg(test)]
mod tests {
    use dreamcanvas_contracts::wizard::{AspectRatio, ConfigUpdate, DataUri, ImageConfig};
    use mockito::Matcher;

    use super::*;
    use crate::compiler::{compile_request, extract_image};

    fn request_with_reference() -> GenerationRequest {
        compile_request(&ImageConfig::default().merged(
            ConfigUpdate::new()
                .aspect_ratio(AspectRatio::Portrait)
                .prompt("a flying cat")
                .reference_image(DataUri::parse("data:image/jpeg;base64,/9j/4AAQ").ok()),
        ))
    }

    fn provider_for(server: &mockito::Server) -> GeminiProvider {
        GeminiProvider::new(
            GeminiSettings::new("gemini-3-pro-image-preview").with_api_base(server.url()),
        )
    }

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    #[test]
    fn payload_places_inline_data_first_and_sets_image_config() {
        let payload = GeminiProvider::build_payload(&request_with_reference());
        let parts = payload["contents"][0]["parts"].as_array().cloned().unwrap_or_default();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], json!("image/jpeg"));
        assert_eq!(parts[0]["inlineData"]["data"], json!("/9j/4AAQ"));
        assert!(parts[1]["text"].as_str().unwrap_or_default().contains("a flying cat"));
        assert_eq!(payload["contents"][0]["role"], json!("user"));
        assert_eq!(
            payload["generationConfig"]["imageConfig"],
            json!({ "aspectRatio": "9:16", "imageSize": "2K" })
        );
    }

    #[test]
    fn endpoint_accepts_prefixed_model_names() {
        let provider = GeminiProvider::new(
            GeminiSettings::new("models/gemini-2.5-flash-image").with_api_base("http://x/v1beta/"),
        );
        assert_eq!(
            provider.endpoint(),
            "http://x/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn timeout_is_clamped() {
        assert_eq!(timeout_from_raw(None), Duration::from_secs(90));
        assert_eq!(timeout_from_raw(Some("5")), Duration::from_secs(15));
        assert_eq!(timeout_from_raw(Some("1000")), Duration::from_secs(300));
        assert_eq!(timeout_from_raw(Some("soon")), Duration::from_secs(90));
    }

    #[test]
    fn parse_response_reads_both_key_spellings() {
        let payload = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "thinking" } ] } },
                { "content": { "parts": [
                    { "inline_data": { "mime_type": "image/webp", "data": "UklGRg==" } }
                ] } }
            ]
        });
        let response = GeminiProvider::parse_response(&payload);
        assert_eq!(response.parts.len(), 2);
        assert_eq!(response.parts[0].text.as_deref(), Some("thinking"));
        let image = extract_image(&response, "x").unwrap();
        assert_eq!(image.data_uri.to_string(), "data:image/webp;base64,UklGRg==");
    }

    #[test]
    fn parse_response_without_candidates_is_empty() {
        let response = GeminiProvider::parse_response(&json!({ "promptFeedback": {} }));
        assert!(response.parts.is_empty());
    }

    #[test]
    fn generate_posts_payload_and_returns_parts() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/models/gemini-3-pro-image-preview:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "imageConfig": { "aspectRatio": "9:16" } }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"iVBORw=="}}]}}]}"#,
            )
            .expect(1)
            .create();

        let response = provider_for(&server)
            .generate(&request_with_reference(), &key())
            .unwrap();
        mock.assert();
        let image = extract_image(&response, "a flying cat").unwrap();
        assert_eq!(image.data_uri.to_string(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn non_success_status_is_an_error_with_body_excerpt() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/models/gemini-3-pro-image-preview:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("quota exhausted")
            .expect(1)
            .create();

        let err = provider_for(&server)
            .generate(&request_with_reference(), &key())
            .unwrap_err();
        mock.assert();
        assert_eq!(err.to_string(), "Gemini request failed (429): quota exhausted");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/models/gemini-3-pro-image-preview:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>")
            .create();

        let err = provider_for(&server)
            .generate(&request_with_reference(), &key())
            .unwrap_err();
        assert_eq!(err.to_string(), "Gemini returned invalid JSON payload");
    }
}
