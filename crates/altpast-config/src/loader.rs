use std::path::Path;

use secrecy::SecretString;

use crate::Config;

/// Environment variable holding the `OpenAI` API key
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the Replicate API token
pub const REPLICATE_API_KEY_ENV: &str = "REPLICATE_API_KEY";

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Default configuration with credentials taken from the environment
    ///
    /// Used when no configuration file exists.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.openai.api_key = std::env::var(OPENAI_API_KEY_ENV).ok().map(SecretString::from);
        config.replicate.api_key = std::env::var(REPLICATE_API_KEY_ENV).ok().map(SecretString::from);
        config
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Missing credentials are not an error: the affected endpoints answer
    /// with a configuration error at request time instead.
    ///
    /// # Errors
    ///
    /// Returns an error if generation or analysis settings are unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.body_limit == 0 || self.transcription.max_upload_bytes == 0 {
            anyhow::bail!("request body limits must be greater than 0");
        }

        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        self.validate_generation()?;
        self.validate_analysis()?;
        self.warn_missing_credentials();
        Ok(())
    }

    fn validate_generation(&self) -> anyhow::Result<()> {
        let generation = &self.generation;

        generation.target().map_err(|e| anyhow::anyhow!(e))?;

        if generation.max_attempts == 0 {
            anyhow::bail!("generation.max_attempts must be greater than 0");
        }

        if generation.poll_interval.is_zero() {
            anyhow::bail!("generation.poll_interval must be greater than 0");
        }

        if generation.image_field.trim().is_empty() {
            anyhow::bail!("generation.image_field must not be empty");
        }

        Ok(())
    }

    fn validate_analysis(&self) -> anyhow::Result<()> {
        if !(0.0..=2.0).contains(&self.analysis.temperature) {
            anyhow::bail!("analysis.temperature must be between 0 and 2");
        }

        if self.analysis.max_tokens == 0 {
            anyhow::bail!("analysis.max_tokens must be greater than 0");
        }

        Ok(())
    }

    fn warn_missing_credentials(&self) {
        if self.openai.credential().is_none() {
            tracing::warn!("no OpenAI API key configured, /api/transcribe and /api/analyze will fail");
        }

        if self.replicate.credential().is_none() {
            tracing::warn!("no Replicate API key configured, /api/generate will fail");
        }
    }
}
