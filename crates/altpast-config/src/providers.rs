use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// `OpenAI` account used for transcription and image analysis
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key, sent as a bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default = "default_openai_base_url")]
    pub base_url: Url,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
        }
    }
}

impl OpenAiConfig {
    /// The API key, treating an empty value as absent
    pub fn credential(&self) -> Option<&SecretString> {
        non_empty(self.api_key.as_ref())
    }
}

/// Replicate account used for image generation
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplicateConfig {
    /// API token, sent as `Authorization: Token <key>`
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default = "default_replicate_base_url")]
    pub base_url: Url,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_replicate_base_url(),
        }
    }
}

impl ReplicateConfig {
    /// The API token, treating an empty value as absent
    pub fn credential(&self) -> Option<&SecretString> {
        non_empty(self.api_key.as_ref())
    }
}

// `{{ env.KEY | default("") }}` leaves an empty string behind
fn non_empty(key: Option<&SecretString>) -> Option<&SecretString> {
    key.filter(|k| !k.expose_secret().trim().is_empty())
}

fn default_openai_base_url() -> Url {
    Url::parse("https://api.openai.com/v1").expect("must be a valid URL")
}

fn default_replicate_base_url() -> Url {
    Url::parse("https://api.replicate.com/v1").expect("must be a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_counts_as_missing() {
        let config: OpenAiConfig = toml::from_str("api_key = \"  \"").unwrap();
        assert!(config.credential().is_none());

        let config: ReplicateConfig = toml::from_str("api_key = \"r8_abc\"").unwrap();
        assert_eq!(config.credential().map(ExposeSecret::expose_secret), Some("r8_abc"));
    }

    #[test]
    fn default_base_urls() {
        assert_eq!(OpenAiConfig::default().base_url.as_str(), "https://api.openai.com/v1");
        assert_eq!(ReplicateConfig::default().base_url.as_str(), "https://api.replicate.com/v1");
    }
}
