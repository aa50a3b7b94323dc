use serde::{Deserialize, Serialize};

use crate::multipart::UploadedFile;

/// Filename sent upstream when the upload carried none
pub(crate) const DEFAULT_AUDIO_FILENAME: &str = "audio.wav";

/// Audio handed to a speech-to-text provider
#[derive(Debug)]
pub struct TranscriptionRequest {
    /// Raw audio bytes
    pub audio: axum::body::Bytes,
    /// Original filename
    pub filename: String,
    /// Content type of the upload
    pub content_type: String,
    /// Model identifier (e.g. "whisper-1")
    pub model: String,
    /// Optional language hint (ISO 639-1)
    pub language: Option<String>,
}

impl TranscriptionRequest {
    pub(crate) fn from_upload(file: UploadedFile, model: String, language: Option<String>) -> Self {
        Self {
            audio: file.buffer,
            filename: file
                .filename
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_AUDIO_FILENAME.to_string()),
            content_type: file.content_type,
            model,
            language,
        }
    }
}

/// Body of a successful `/api/transcribe` call
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptionResponse {
    /// Transcribed text
    pub text: String,
    pub success: bool,
}

impl TranscriptionResponse {
    pub fn new(text: String) -> Self {
        Self { text, success: true }
    }
}
