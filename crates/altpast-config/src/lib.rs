#![allow(clippy::must_use_candidate)]

pub mod analysis;
pub mod cors;
mod env;
pub mod generation;
pub mod health;
mod loader;
pub mod providers;
pub mod server;
pub mod telemetry;
pub mod transcription;

use serde::Deserialize;

pub use analysis::*;
pub use cors::*;
pub use generation::*;
pub use health::*;
pub use loader::{OPENAI_API_KEY_ENV, REPLICATE_API_KEY_ENV};
pub use providers::*;
pub use server::*;
pub use telemetry::TelemetryConfig;
pub use transcription::*;

/// Top-level altpast configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// `OpenAI` credentials (speech-to-text and vision)
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Replicate credentials (image generation)
    #[serde(default)]
    pub replicate: ReplicateConfig,
    /// Transcription settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Image analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Image generation settings
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
