pub(crate) mod whisper;

use async_trait::async_trait;

use crate::types::TranscriptionRequest;

/// Trait for speech-to-text provider implementations
#[async_trait]
pub(crate) trait SttProvider: Send + Sync {
    /// Transcribe audio to text
    async fn transcribe(&self, request: TranscriptionRequest) -> crate::error::Result<String>;
}
