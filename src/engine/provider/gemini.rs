use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ParsedGarment, TextGenerator};
use crate::config::GeminiConfig;
use crate::db::models::Garment;
use crate::engine::{parser, prompt};
use crate::error::AppError;

/// Convert any displayable error into `AppError::ServiceUnavailable`.
fn service_err(e: impl std::fmt::Display) -> AppError {
    AppError::ServiceUnavailable(e.to_string())
}

// ============================================================================
// Request / response bodies (generateContent)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: RequestContent<'a>,
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    status: Option<String>,
}

fn build_request<'a>(system: &'a str, user: &'a str, json_output: bool) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        system_instruction: RequestContent {
            role: None,
            parts: vec![RequestPart { text: system }],
        },
        contents: vec![RequestContent {
            role: Some("user"),
            parts: vec![RequestPart { text: user }],
        }],
        generation_config: json_output.then_some(GenerationConfig {
            response_mime_type: "application/json",
        }),
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, AppError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|f| f.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match block_reason {
            Some(reason) => service_err(format!("prompt blocked: {reason}")),
            None => service_err("no candidates returned"),
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(service_err(format!("empty response (finish reason: {reason})")));
    }
    Ok(text)
}

/// Turn a non-2xx body into a readable message, falling back to the raw text.
fn describe_api_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => match err.error.status {
            Some(s) => format!("HTTP {status} {s}: {}", err.error.message),
            None => format!("HTTP {status}: {}", err.error.message),
        },
        Err(_) => format!("HTTP {status}: {}", body.chars().take(200).collect::<String>()),
    }
}

// ============================================================================
// GeminiProvider
// ============================================================================

/// Text generation over the Gemini `generateContent` REST API.
pub struct GeminiProvider {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig, api_key: &str) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    async fn generate(&self, request: &GenerateContentRequest<'_>) -> Result<String, AppError> {
        tracing::debug!(model = %self.model, "Calling Gemini generateContent");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(service_err)?;

        let status = response.status();
        let body = response.text().await.map_err(service_err)?;

        if !status.is_success() {
            let message = describe_api_error(status, &body);
            tracing::warn!(model = %self.model, "Gemini request failed: {}", message);
            return Err(AppError::ServiceUnavailable(message));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Gemini returned an unexpected body: {}", e);
            service_err(format!("unexpected response body: {e}"))
        })?;
        extract_text(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn parse_garment_text(&self, text: &str) -> Result<ParsedGarment, AppError> {
        let user = prompt::parse_garment_message(text);
        let raw = self
            .generate(&build_request(prompt::PARSE_GARMENT_SYSTEM, &user, true))
            .await?;
        parser::parse_garment_output(&raw).ok_or_else(|| {
            tracing::warn!("Could not find garment JSON in model output: {}", raw);
            service_err("model did not return a garment description")
        })
    }

    async fn generate_outfit_idea(&self, text: &str) -> Result<String, AppError> {
        let user = prompt::outfit_idea_message(text);
        self.generate(&build_request(prompt::OUTFIT_IDEA_SYSTEM, &user, false))
            .await
    }

    async fn generate_outfit_from_closet(&self, garments: &[Garment]) -> Result<String, AppError> {
        let user = prompt::closet_message(garments);
        self.generate(&build_request(prompt::CLOSET_OUTFIT_SYSTEM, &user, false))
            .await
    }
}
