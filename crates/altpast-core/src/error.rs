use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. [`ErrorReply`] turns
/// these into JSON bodies, keeping domain errors decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `validation_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// Detail that is returned even outside development mode
    fn public_details(&self) -> Option<String> {
        None
    }
}

/// Wire format of every error body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// A rendered error, ready to be returned from a handler
///
/// The full error is logged when the reply is built. `details` carries the
/// error's `Display` output only when `expose_details` is set.
#[derive(Debug)]
pub struct ErrorReply {
    status: StatusCode,
    body: ErrorBody,
}

impl ErrorReply {
    pub fn new<E: HttpError>(error: &E, expose_details: bool) -> Self {
        let status = error.status_code();

        if status.is_server_error() {
            tracing::error!(error = %error, error_type = error.error_type(), "request failed");
        } else {
            tracing::debug!(error = %error, error_type = error.error_type(), "request rejected");
        }

        let details = error
            .public_details()
            .or_else(|| expose_details.then(|| error.to_string()));

        Self {
            status,
            body: ErrorBody {
                error: error.client_message(),
                details,
            },
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum DemoError {
        #[error("upstream said: quota exceeded")]
        Upstream,
        #[error("job failed: {0}")]
        Failed(String),
    }

    impl HttpError for DemoError {
        fn status_code(&self) -> StatusCode {
            StatusCode::INTERNAL_SERVER_ERROR
        }

        fn error_type(&self) -> &str {
            "demo_error"
        }

        fn client_message(&self) -> String {
            "Something went wrong".to_owned()
        }

        fn public_details(&self) -> Option<String> {
            match self {
                Self::Failed(detail) => Some(detail.clone()),
                Self::Upstream => None,
            }
        }
    }

    async fn body_json(reply: ErrorReply) -> serde_json::Value {
        let response = reply.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn hides_details_in_production() {
        let reply = ErrorReply::new(&DemoError::Upstream, false);
        assert_eq!(reply.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(reply).await;
        assert_eq!(body, serde_json::json!({ "error": "Something went wrong" }));
    }

    #[tokio::test]
    async fn shows_details_in_development() {
        let body = body_json(ErrorReply::new(&DemoError::Upstream, true)).await;
        assert_eq!(body["details"], "upstream said: quota exceeded");
    }

    #[tokio::test]
    async fn public_details_are_always_shown() {
        let body = body_json(ErrorReply::new(&DemoError::Failed("NSFW content".to_owned()), false)).await;
        assert_eq!(body["details"], "NSFW content");
    }
}
