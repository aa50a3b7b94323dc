use altpast_core::HttpError;
use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzeError>;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("OpenAI API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("unusable completion: {0}")]
    InvalidResponse(String),
}

impl HttpError for AnalyzeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ConfigError(_) | Self::ProviderApiError { .. } | Self::ConnectionError(_) | Self::InvalidResponse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::ConfigError(_) => "configuration_error",
            Self::InvalidRequest(_) => "validation_error",
            Self::ProviderApiError { .. } | Self::ConnectionError(_) | Self::InvalidResponse(_) => "upstream_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::ConfigError(_) => {
                "OpenAI API key not configured. Please set OPENAI_API_KEY environment variable.".to_string()
            }
            Self::InvalidRequest(message) => message.clone(),
            Self::ProviderApiError { .. } | Self::ConnectionError(_) | Self::InvalidResponse(_) => {
                "Failed to analyze content. Please check your OpenAI API key and try again.".to_string()
            }
        }
    }
}
