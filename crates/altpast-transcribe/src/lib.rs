#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Speech-to-text for uploaded story recordings

mod error;
pub mod multipart;
mod provider;
mod server;
mod types;

use std::sync::Arc;

use altpast_core::{ErrorReply, endpoint};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
};
use http::{HeaderMap, header};

pub use error::{Result, TranscribeError};
pub use server::Server;
pub use types::{TranscriptionRequest, TranscriptionResponse};

use server::TranscribeServerBuilder;

/// Route served by this crate
pub const TRANSCRIBE_PATH: &str = "/api/transcribe";

/// Build the transcription server from configuration
pub fn build_server(config: &altpast_config::Config) -> anyhow::Result<Arc<Server>> {
    Ok(Arc::new(TranscribeServerBuilder::new(config).build()))
}

/// Create the endpoint router for transcription
pub fn endpoint_router(max_upload_bytes: usize) -> Router<Arc<Server>> {
    Router::new()
        .route(TRANSCRIBE_PATH, endpoint(transcribe))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Handle transcription requests
async fn transcribe(
    State(server): State<Arc<Server>>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<TranscriptionResponse>, ErrorReply> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    tracing::debug!(bytes = body.len(), "transcription handler called");

    let response = server
        .transcribe(content_type, &body)
        .await
        .map_err(|e| server.reply(&e))?;

    tracing::debug!("transcription complete");

    Ok(Json(response))
}
