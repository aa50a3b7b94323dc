use std::time::Instant;

use altpast_core::http_client;
use altpast_telemetry::metrics::record_upstream_call;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{error::TranscribeError, types::TranscriptionRequest};

use super::SttProvider;

/// `OpenAI` Whisper speech-to-text provider
pub(crate) struct WhisperProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl WhisperProvider {
    pub fn new(api_key: SecretString, base_url: &Url) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

#[async_trait]
impl SttProvider for WhisperProvider {
    async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<String> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        tracing::debug!(
            bytes = request.audio.len(),
            model = %request.model,
            filename = %request.filename,
            "Whisper transcription request"
        );

        let part = reqwest::multipart::Part::bytes(request.audio.to_vec())
            .file_name(request.filename)
            .mime_str(&request.content_type)
            .map_err(|e| TranscribeError::InvalidRequest(format!("Invalid audio content type: {e}")))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", request.model);

        if let Some(language) = request.language {
            form = form.text("language", language);
        }

        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                record_upstream_call("whisper", "transcribe", start, "error");
                TranscribeError::ConnectionError(format!("Failed to send request to Whisper: {e}"))
            })?;

        let status = response.status();
        record_upstream_call("whisper", "transcribe", start, status.as_str());

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(TranscribeError::ProviderApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let result: WhisperResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::InternalError(format!("Failed to parse Whisper response: {e}")))?;

        tracing::debug!(chars = result.text.len(), "Whisper transcription complete");

        Ok(result.text)
    }
}
