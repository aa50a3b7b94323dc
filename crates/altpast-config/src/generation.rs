use std::time::Duration;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value, json};

/// Stable Diffusion XL image-to-image
const DEFAULT_VERSION: &str = "ac732df83cea7fff18b8472768c88ad041fa750ff7682a21affe81863cbe77e4";

/// Image generation (Replicate prediction) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Pinned model version hash, posted to `/predictions`
    #[serde(default)]
    pub version: Option<String>,
    /// Official model name (`owner/name`), posted to `/models/{owner}/{name}/predictions`
    #[serde(default)]
    pub model: Option<String>,
    /// Input field carrying the source image
    #[serde(default = "default_image_field")]
    pub image_field: String,
    /// Fixed model inputs merged into every prediction
    #[serde(default = "default_input")]
    pub input: Map<String, Value>,
    /// Time between status checks
    #[serde(default = "default_poll_interval", deserialize_with = "deserialize_duration")]
    pub poll_interval: Duration,
    /// Status checks allowed before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            version: None,
            model: None,
            image_field: default_image_field(),
            input: default_input(),
            poll_interval: default_poll_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Where a prediction gets created
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionTarget {
    /// A specific model version
    Version(String),
    /// The latest version of an official model
    Model { owner: String, name: String },
}

impl GenerationConfig {
    /// Resolve the configured model target
    ///
    /// # Errors
    ///
    /// Returns an error if both `version` and `model` are set, or if `model`
    /// is not of the form `owner/name`
    pub fn target(&self) -> Result<PredictionTarget, String> {
        match (&self.version, &self.model) {
            (Some(_), Some(_)) => Err("generation.version and generation.model are mutually exclusive".to_owned()),
            (Some(version), None) => Ok(PredictionTarget::Version(version.clone())),
            (None, Some(model)) => match model.split_once('/') {
                Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                    Ok(PredictionTarget::Model {
                        owner: owner.to_owned(),
                        name: name.to_owned(),
                    })
                }
                _ => Err(format!("generation.model must look like 'owner/name', got '{model}'")),
            },
            (None, None) => Ok(PredictionTarget::Version(DEFAULT_VERSION.to_owned())),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}

fn default_image_field() -> String {
    "image".to_owned()
}

fn default_input() -> Map<String, Value> {
    let mut input = Map::new();
    input.insert("num_inference_steps".to_owned(), json!(20));
    input.insert("guidance_scale".to_owned(), json!(7.5));
    // how far the output may drift from the source image
    input.insert("strength".to_owned(), json!(0.8));
    input.insert("scheduler".to_owned(), json!("K_EULER"));
    input
}

const fn default_poll_interval() -> Duration {
    Duration::from_secs(10)
}

const fn default_max_attempts() -> u32 {
    30
}
