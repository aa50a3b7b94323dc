//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use altpast_config::Config;
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with no credentials
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 0)));

        Self { config }
    }

    /// Point `OpenAI` calls at a mock backend
    pub fn with_openai(mut self, base_url: &str) -> Self {
        self.config.openai.api_key = Some(SecretString::from("sk-test"));
        self.config.openai.base_url = base_url.parse().expect("valid URL");
        self
    }

    /// Point Replicate calls at a mock backend
    pub fn with_replicate(mut self, base_url: &str) -> Self {
        self.config.replicate.api_key = Some(SecretString::from("r8-test"));
        self.config.replicate.base_url = base_url.parse().expect("valid URL");
        self
    }

    /// Poll quickly so tests stay fast
    pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.config.generation.poll_interval = interval;
        self.config.generation.max_attempts = max_attempts;
        self
    }

    /// Target an official model instead of a pinned version
    pub fn with_generation_model(mut self, model: &str, image_field: &str) -> Self {
        self.config.generation.version = None;
        self.config.generation.model = Some(model.to_owned());
        self.config.generation.image_field = image_field.to_owned();
        self
    }

    /// Include error details in responses
    pub fn development(mut self) -> Self {
        self.config.server.development = true;
        self
    }

    /// Cap the transcription upload size
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.config.transcription.max_upload_bytes = limit;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
