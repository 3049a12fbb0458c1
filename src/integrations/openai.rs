use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::IssueDraft;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You create GitHub issues based on the user message.";
const SCHEMA_NAME: &str = "github_issue";

/// Minimal OpenAI config used by the drafting helpers.
#[derive(Clone, Debug)]
pub struct OpenAiCfg {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

pub struct OpenAi {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAi {
    pub fn new(cfg: &OpenAiCfg) -> Self {
        Self {
            client: Client::new(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Ask the model for a full issue draft for the given description.
    /// The response is constrained to the issue schema; output that still
    /// fails to parse is an error, there is no retry here.
    pub async fn draft_issue(&self, description: &str) -> Result<IssueDraft> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: description.to_string(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: SCHEMA_NAME.to_string(),
                    strict: true,
                    schema: issue_schema(),
                },
            },
        };

        debug!("OpenAI request: model={}", request.model);

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("OpenAI API request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read OpenAI response")?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                anyhow::bail!("OpenAI API error: {}", error.error.message);
            }
            anyhow::bail!("OpenAI API error ({status}): {body}");
        }

        let chat: ChatResponse =
            serde_json::from_str(&body).context("Failed to parse OpenAI response")?;

        let content = chat
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| anyhow::anyhow!("OpenAI response contained no content"))?;

        serde_json::from_str(content).context("Model output did not match the issue schema")
    }
}

fn issue_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "body": { "type": "string" },
            "labels": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["title", "body", "labels"],
        "additionalProperties": false
    })
}
