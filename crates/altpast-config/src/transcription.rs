use serde::Deserialize;

/// Speech-to-text settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionConfig {
    /// Upstream model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Language hint (ISO 639-1), omitted from the upstream request when unset
    #[serde(default = "default_language")]
    pub language: Option<String>,
    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            language: default_language(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_model() -> String {
    "whisper-1".to_owned()
}

#[allow(clippy::unnecessary_wraps)]
fn default_language() -> Option<String> {
    Some("en".to_owned())
}

const fn default_max_upload_bytes() -> usize {
    32 << 20
}
