use altpast_config::Config;
use altpast_core::ErrorReply;
use axum::body::Bytes;

use crate::{
    error::{Result, TranscribeError},
    multipart,
    provider::{SttProvider, whisper::WhisperProvider},
    types::{TranscriptionRequest, TranscriptionResponse},
};

/// Multipart field carrying the recording
pub(crate) const AUDIO_FIELD: &str = "audio";

/// Transcription server wrapping the configured speech-to-text provider
pub struct Server {
    /// `None` when no `OpenAI` key is configured
    provider: Option<Box<dyn SttProvider>>,
    model: String,
    language: Option<String>,
    max_upload_bytes: usize,
    expose_details: bool,
}

impl Server {
    /// Transcribe the `audio` field of a multipart upload
    pub async fn transcribe(&self, content_type: &str, body: &Bytes) -> Result<TranscriptionResponse> {
        let provider = self
            .provider
            .as_deref()
            .ok_or_else(|| TranscribeError::ConfigError("OpenAI API key is not set".to_string()))?;

        let mut fields = multipart::extract(content_type, body)?;

        let audio = fields
            .remove(AUDIO_FIELD)
            .ok_or_else(|| TranscribeError::InvalidRequest("No audio file provided".to_string()))?;

        tracing::debug!(
            bytes = audio.buffer.len(),
            content_type = %audio.content_type,
            "received audio upload"
        );

        let request = TranscriptionRequest::from_upload(audio, self.model.clone(), self.language.clone());
        let text = provider.transcribe(request).await?;

        Ok(TranscriptionResponse::new(text))
    }

    /// Largest accepted request body
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub(crate) fn reply(&self, error: &TranscribeError) -> ErrorReply {
        ErrorReply::new(error, self.expose_details)
    }
}

/// Builder for constructing the transcription server from configuration
pub(crate) struct TranscribeServerBuilder<'a> {
    config: &'a Config,
}

impl<'a> TranscribeServerBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> Server {
        let openai = &self.config.openai;
        let transcription = &self.config.transcription;

        let provider = openai.credential().map(|api_key| {
            Box::new(WhisperProvider::new(api_key.clone(), &openai.base_url)) as Box<dyn SttProvider>
        });

        if provider.is_none() {
            tracing::debug!("no OpenAI key configured, transcription requests will fail");
        }

        Server {
            provider,
            model: transcription.model.clone(),
            language: transcription.language.clone().filter(|l| !l.is_empty()),
            max_upload_bytes: transcription.max_upload_bytes,
            expose_details: self.config.server.development,
        }
    }
}
