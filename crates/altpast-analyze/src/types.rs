use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `/api/analyze`
///
/// Both fields are optional at the wire level so that a missing field is a
/// validation error rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 image or `data:` URL
    #[serde(default)]
    pub image: Option<String>,
    /// Transcript of the spoken story
    #[serde(default)]
    pub transcription: Option<String>,
}

/// Structured reading of a photo and its story
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    /// What the model sees in the image
    pub description: String,
    /// Image generation prompt
    pub prompt: String,
    /// Suggested artistic style
    pub style: String,
    /// Mood or atmosphere to convey
    pub mood: String,
    /// Any other keys the model returned, passed through to the caller
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a successful `/api/analyze` call
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub success: bool,
}

impl From<AnalysisResult> for AnalyzeResponse {
    fn from(analysis: AnalysisResult) -> Self {
        Self { analysis, success: true }
    }
}

/// A single multimodal completion request
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Data URL of the image
    pub image_url: String,
}
