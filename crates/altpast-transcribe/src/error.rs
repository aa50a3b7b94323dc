use altpast_core::HttpError;
use http::StatusCode;
use thiserror::Error;

use crate::multipart::MultipartError;

pub type Result<T> = std::result::Result<T, TranscribeError>;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("malformed multipart body: {0}")]
    MalformedRequest(#[from] MultipartError),

    #[error("Whisper API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl HttpError for TranscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ConfigError(_)
            | Self::MalformedRequest(_)
            | Self::ProviderApiError { .. }
            | Self::ConnectionError(_)
            | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::ConfigError(_) => "configuration_error",
            Self::InvalidRequest(_) => "validation_error",
            Self::MalformedRequest(_) => "malformed_request_error",
            Self::ProviderApiError { .. } | Self::ConnectionError(_) => "upstream_error",
            Self::InternalError(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::ConfigError(_) => {
                "OpenAI API key not configured. Please set OPENAI_API_KEY environment variable.".to_string()
            }
            Self::InvalidRequest(message) => message.clone(),
            Self::ProviderApiError { .. } | Self::ConnectionError(_) => {
                "Failed to transcribe audio. Please check your OpenAI API key and try again.".to_string()
            }
            Self::MalformedRequest(_) | Self::InternalError(_) => {
                "Internal server error during transcription".to_string()
            }
        }
    }
}
