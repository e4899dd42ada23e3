use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::advisor::prompts;
use crate::advisor::provider::{Advisor, AdvisorError, SuggestionRequest, SuggestionResponse};

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 2048;

/// Suggestion provider backed by the Anthropic Messages API.
///
/// Makes exactly one request per call; retrying is left to the caller.
pub struct ClaudeAdvisor {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl ClaudeAdvisor {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            endpoint: CLAUDE_API_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, prompt: &str) -> Result<String, AdvisorError> {
        if self.api_key.is_empty() {
            return Err(AdvisorError::MissingApiKey);
        }

        let request_body = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", CLAUDE_API_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdvisorError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let claude_resp: ClaudeResponse = resp
            .json()
            .await
            .map_err(|e| AdvisorError::ParseError(format!("Failed to parse JSON: {}", e)))?;

        claude_resp
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| AdvisorError::InvalidResponse("Empty content array in response".to_string()))
    }
}

#[async_trait]
impl Advisor for ClaudeAdvisor {
    fn name(&self) -> &str {
        "claude"
    }

    async fn suggest(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, AdvisorError> {
        let prompt = prompts::build_suggestion_prompt(request)
            .map_err(|e| AdvisorError::ParseError(e.to_string()))?;
        let text = self.send_request(&prompt).await?;
        parse_suggestion(&text)
    }
}

/// Parse the model's reply, tolerating prose or code fences around the JSON object.
pub fn parse_suggestion(text: &str) -> Result<SuggestionResponse, AdvisorError> {
    let json_text = extract_json_from_text(text);
    serde_json::from_str(json_text)
        .map_err(|e| AdvisorError::ParseError(format!("Failed to parse suggestion: {}", e)))
}

fn extract_json_from_text(text: &str) -> &str {
    let text = text.trim();
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    text: String,
}
