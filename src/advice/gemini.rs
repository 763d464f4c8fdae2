//! Gemini REST client
//!
//! Calls `POST {api_base}/models/{model}:generateContent` directly. The key is
//! sent in the `x-goog-api-key` header so it never appears in logged URLs.

use super::{system_instruction, AdviceError, AdviceGenerator, FALLBACK_REPLY};
use crate::chat::{HistoryEntry, Role};
use crate::config::AdviceConfig;
use crate::data::Pet;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub struct GeminiAdvisor {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiAdvisor {
    pub fn new(config: &AdviceConfig) -> Result<Self, AdviceError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AdviceError::Network("missing API key".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdviceError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini advisor: {} (model: {})",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    async fn try_generate(
        &self,
        user_text: &str,
        pet: Option<&Pet>,
        history: &[HistoryEntry],
    ) -> Result<String, AdviceError> {
        let body = build_request(user_text, pet, history);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdviceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(AdviceError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AdviceError::Decode(e.to_string()))?;

        extract_text(parsed)
    }
}

#[async_trait]
impl AdviceGenerator for GeminiAdvisor {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn generate_advice(
        &self,
        user_text: &str,
        pet: Option<&Pet>,
        history: &[HistoryEntry],
    ) -> String {
        let started = Instant::now();
        match self.try_generate(user_text, pet, history).await {
            Ok(text) => {
                tracing::info!(
                    model = %self.model,
                    turns = history.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Advice generated"
                );
                text
            }
            Err(e) => {
                tracing::warn!("Advice request failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Map the transcript onto Gemini turns. The greeting (and any other leading
/// assistant turn) is dropped so the conversation opens with the user, and
/// `user_text` is appended if the history does not already end with it.
pub(crate) fn build_request(
    user_text: &str,
    pet: Option<&Pet>,
    history: &[HistoryEntry],
) -> GenerateContentRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .skip_while(|entry| entry.role == Role::Assistant)
        .map(|entry| Content {
            role: Some(wire_role(entry.role)),
            parts: vec![Part {
                text: entry.text.clone(),
            }],
        })
        .collect();

    let ends_with_question = matches!(
        history.last(),
        Some(last) if last.role == Role::User && last.text == user_text
    );
    if !ends_with_question {
        contents.push(Content {
            role: Some("user"),
            parts: vec![Part {
                text: user_text.to_string(),
            }],
        });
    }

    GenerateContentRequest {
        contents,
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: system_instruction(pet),
            }],
        },
    }
}

/// First non-empty text part of the first candidate that has one
pub(crate) fn extract_text(response: GenerateContentResponse) -> Result<String, AdviceError> {
    response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .find(|text| !text.trim().is_empty())
        .ok_or(AdviceError::EmptyResponse)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status) if !status.is_empty() => format!("{}: {}", status, msg),
                _ => msg,
            }
        })
        .unwrap_or_else(|_| crate::util::truncate_utf8_safe(body, 200).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use axum::{http::StatusCode, response::IntoResponse, Json, Router};
    use serde_json::{json, Value};

    fn entry(role: Role, text: &str) -> HistoryEntry {
        HistoryEntry {
            role,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_request_skips_greeting_and_maps_roles() {
        let history = vec![
            entry(Role::Assistant, "Hi! I'm your veterinary assistant."),
            entry(Role::User, "Is chocolate bad for dogs?"),
            entry(Role::Assistant, "Yes, very."),
            entry(Role::User, "What about grapes?"),
        ];
        let body = serde_json::to_value(build_request("What about grapes?", None, &history)).unwrap();

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "What about grapes?");
        assert!(body["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn test_request_appends_question_missing_from_history() {
        let history = vec![entry(Role::Assistant, "Hello")];
        let data = Dataset::mock();
        let body = serde_json::to_value(build_request("Hi", data.pet("p1"), &history)).unwrap();

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "Hi");
        let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(instruction.contains("Buddy"));
    }

    #[test]
    fn test_extract_text_picks_first_text_part() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "" }, { "text": "Keep him hydrated." } ] } }
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Keep him hydrated.");
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(extract_text(response), Err(AdviceError::EmptyResponse)));
    }

    #[test]
    fn test_error_message_prefers_api_status() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "INVALID_ARGUMENT: API key not valid");
        assert_eq!(error_message("plain failure"), "plain failure");
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    fn advisor_for(api_base: String) -> GeminiAdvisor {
        GeminiAdvisor::new(&AdviceConfig {
            api_key: Some("test-key".to_string()),
            api_base,
            timeout_secs: 5,
            ..AdviceConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_advice_against_local_endpoint() {
        async fn reply(headers: axum::http::HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
            if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
                return (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response();
            }
            let question = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or("");
            Json(json!({
                "candidates": [ { "content": { "role": "model", "parts": [ { "text": format!("echo: {question}") } ] } } ]
            }))
            .into_response()
        }

        let base = serve(Router::new().fallback(reply)).await;
        let advisor = advisor_for(base);
        let history = vec![entry(Role::User, "Can cats eat tuna?")];

        let text = advisor
            .generate_advice("Can cats eat tuna?", None, &history)
            .await;
        assert_eq!(text, "echo: Can cats eat tuna?");
    }

    #[tokio::test]
    async fn test_generate_advice_falls_back_on_server_error() {
        async fn fail() -> impl IntoResponse {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": { "message": "boom", "status": "INTERNAL" } })),
            )
        }

        let base = serve(Router::new().fallback(fail)).await;
        let advisor = advisor_for(base);

        let text = advisor.generate_advice("hello", None, &[]).await;
        assert_eq!(text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_generate_advice_falls_back_when_unreachable() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let advisor = advisor_for(format!("http://{}/v1beta", addr));
        let text = advisor.generate_advice("hello", None, &[]).await;
        assert_eq!(text, FALLBACK_REPLY);
    }
}
