use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UNKNOWN_FAILURE;

/// Body of `/api/generate`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Base64 image, `data:` URL or `http(s)` URL
    #[serde(default)]
    pub original_image: Option<String>,
    /// Generation prompt, usually from `/api/analyze`
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Body of a successful `/api/generate` call
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub image_url: String,
    pub success: bool,
    pub prediction_id: String,
}

/// Lifecycle states of a Replicate prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Starting | Self::Processing)
    }
}

/// A Replicate prediction as returned by create and get
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    /// Raw status, see [`Prediction::status`]
    pub status: String,
    #[serde(default)]
    pub output: Option<PredictionOutput>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Image references produced by a model, one or many
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PredictionOutput {
    Single(String),
    Many(Vec<String>),
}

impl PredictionOutput {
    /// The first non-empty image reference, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(url) => Some(url.as_str()),
            Self::Many(urls) => urls.first().map(String::as_str),
        }
        .filter(|url| !url.is_empty())
    }
}

impl Prediction {
    /// Parsed status, `None` for values this client does not know
    pub fn status(&self) -> Option<PredictionStatus> {
        self.status.parse().ok()
    }

    /// Upstream failure reason, or a generic one
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            Some(Value::Null | Value::String(_)) | None => UNKNOWN_FAILURE.to_string(),
            Some(other) => other.to_string(),
        }
    }
}
