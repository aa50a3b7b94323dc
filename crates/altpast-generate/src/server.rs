use altpast_config::Config;
use altpast_core::{ErrorReply, to_image_reference};
use serde_json::{Map, Value};

use crate::{
    error::{GenerateError, Result},
    poll::{PollSettings, wait_for_output},
    provider::{PredictionProvider, replicate::ReplicateProvider},
    types::{GenerateRequest, GenerateResponse},
};

/// Image generation server wrapping the configured prediction provider
pub struct Server {
    /// `None` when no Replicate key is configured
    provider: Option<Box<dyn PredictionProvider>>,
    /// Fixed model parameters merged into every input
    input: Map<String, Value>,
    /// Input field that carries the source image
    image_field: String,
    poll: PollSettings,
    expose_details: bool,
}

impl Server {
    /// Reimagine a photo from a prompt and wait for the result
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let (Some(original_image), Some(prompt)) = (
            request.original_image.filter(|i| !i.is_empty()),
            request.prompt.filter(|p| !p.is_empty()),
        ) else {
            return Err(GenerateError::InvalidRequest(
                "Both originalImage and prompt are required".to_string(),
            ));
        };

        let provider = self
            .provider
            .as_deref()
            .ok_or_else(|| GenerateError::ConfigError("Replicate API key is not set".to_string()))?;

        let mut input = self.input.clone();
        input.insert("prompt".to_string(), Value::String(prompt));
        input.insert(
            self.image_field.clone(),
            Value::String(to_image_reference(&original_image).into_owned()),
        );

        let prediction = provider.create_prediction(input).await?;
        let completed = wait_for_output(provider, prediction, self.poll).await?;

        tracing::debug!(id = %completed.prediction_id, "image generation complete");

        Ok(GenerateResponse {
            image_url: completed.image_url,
            success: true,
            prediction_id: completed.prediction_id,
        })
    }

    pub(crate) fn reply(&self, error: &GenerateError) -> ErrorReply {
        ErrorReply::new(error, self.expose_details)
    }
}

/// Builder for constructing the generation server from configuration
pub(crate) struct GenerateServerBuilder<'a> {
    config: &'a Config,
}

impl<'a> GenerateServerBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<Server> {
        let replicate = &self.config.replicate;
        let generation = &self.config.generation;

        let target = generation.target().map_err(GenerateError::ConfigError)?;

        let provider = replicate.credential().map(|api_key| {
            Box::new(ReplicateProvider::new(api_key.clone(), &replicate.base_url, target)) as Box<dyn PredictionProvider>
        });

        if provider.is_none() {
            tracing::debug!("no Replicate key configured, generation requests will fail");
        }

        Ok(Server {
            provider,
            input: generation.input.clone(),
            image_field: generation.image_field.clone(),
            poll: PollSettings {
                interval: generation.poll_interval,
                max_attempts: generation.max_attempts,
            },
            expose_details: self.config.server.development,
        })
    }
}
