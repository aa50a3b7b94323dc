use altpast_core::HttpError;
use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Detail reported when a failed prediction carries no error
pub(crate) const UNKNOWN_FAILURE: &str = "Unknown error occurred";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("Replicate API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    #[error("prediction status check failed ({status}): {message}")]
    StatusCheckFailed { status: u16, message: String },

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("invalid Replicate response: {0}")]
    InvalidResponse(String),

    #[error("prediction still running after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error("prediction failed: {0}")]
    GenerationFailed(String),

    #[error("unexpected prediction state: {0}")]
    UnexpectedState(String),
}

impl HttpError for GenerateError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            Self::ConfigError(_)
            | Self::ProviderApiError { .. }
            | Self::StatusCheckFailed { .. }
            | Self::ConnectionError(_)
            | Self::InvalidResponse(_)
            | Self::GenerationFailed(_)
            | Self::UnexpectedState(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::ConfigError(_) => "configuration_error",
            Self::InvalidRequest(_) => "validation_error",
            Self::ProviderApiError { .. }
            | Self::StatusCheckFailed { .. }
            | Self::ConnectionError(_)
            | Self::InvalidResponse(_) => "upstream_error",
            Self::Timeout { .. } => "timeout_error",
            Self::GenerationFailed(_) => "generation_error",
            Self::UnexpectedState(_) => "unexpected_state_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::ConfigError(_) => {
                "Replicate API key not configured. Please set REPLICATE_API_KEY environment variable.".to_string()
            }
            Self::InvalidRequest(message) => message.clone(),
            Self::ProviderApiError { .. } | Self::ConnectionError(_) | Self::InvalidResponse(_) => {
                "Failed to generate image. Please check your Replicate API key and try again.".to_string()
            }
            Self::StatusCheckFailed { .. } => "Failed to check image generation status".to_string(),
            Self::Timeout { .. } => "Image generation timed out. Please try again.".to_string(),
            Self::GenerationFailed(_) => "Image generation failed".to_string(),
            Self::UnexpectedState(_) => "Unexpected status from image generation service".to_string(),
        }
    }

    fn public_details(&self) -> Option<String> {
        match self {
            Self::GenerationFailed(detail) => Some(detail.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use altpast_core::ErrorReply;

    use super::*;

    #[test]
    fn timeout_is_408() {
        let reply = ErrorReply::new(&GenerateError::Timeout { attempts: 30 }, false);
        assert_eq!(reply.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn failure_detail_is_always_public() {
        let error = GenerateError::GenerationFailed("NSFW content detected".to_string());

        assert_eq!(error.public_details().as_deref(), Some("NSFW content detected"));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn other_details_stay_private() {
        let error = GenerateError::UnexpectedState("canceled".to_string());
        assert_eq!(error.public_details(), None);
    }
}
