use std::time::Instant;

use altpast_config::AnalysisConfig;
use altpast_core::http_client;
use altpast_telemetry::metrics::record_upstream_call;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{error::AnalyzeError, types::VisionRequest};

use super::VisionProvider;

/// `OpenAI` chat completions with image input
pub(crate) struct OpenAiVisionProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiVisionProvider {
    pub fn new(api_key: SecretString, base_url: &Url, config: &AnalysisConfig) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: ChatContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl VisionProvider for OpenAiVisionProvider {
    async fn complete(&self, request: VisionRequest) -> crate::error::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: ChatContent::Text(request.system_prompt),
                },
                ChatMessage {
                    role: "user",
                    content: ChatContent::Parts(vec![
                        ContentPart::Text {
                            text: request.user_prompt,
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl { url: request.image_url },
                        },
                    ]),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, "OpenAI vision request");

        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                record_upstream_call("openai_chat", "analyze", start, "error");
                AnalyzeError::ConnectionError(format!("Failed to send request to OpenAI: {e}"))
            })?;

        let status = response.status();
        record_upstream_call("openai_chat", "analyze", start, status.as_str());

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(AnalyzeError::ProviderApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalyzeError::InvalidResponse(format!("Failed to parse OpenAI response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AnalyzeError::InvalidResponse("completion has no content".to_string()))
    }
}
