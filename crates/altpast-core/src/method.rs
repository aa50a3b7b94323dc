use axum::{
    Json,
    handler::Handler,
    response::IntoResponse,
    routing::{MethodRouter, post},
};
use http::StatusCode;

/// Route a `POST` handler with preflight support
///
/// `OPTIONS` answers 200 with an empty body and every other method gets a
/// JSON 405.
pub fn endpoint<H, T, S>(handler: H) -> MethodRouter<S>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    post(handler).options(preflight).fallback(method_not_allowed)
}

/// Empty 200 for CORS preflight requests
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// JSON 405 for anything that is not `POST` or `OPTIONS`
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
}
