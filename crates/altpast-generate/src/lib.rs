#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Image-to-image generation through Replicate predictions

mod error;
mod poll;
mod provider;
mod server;
mod types;

use std::sync::Arc;

use altpast_core::{ErrorReply, endpoint};
use axum::{Json, Router, extract::State};

pub use error::{GenerateError, Result};
pub use server::Server;
pub use types::{GenerateRequest, GenerateResponse};

use server::GenerateServerBuilder;

/// Route served by this crate
pub const GENERATE_PATH: &str = "/api/generate";

/// Build the generation server from configuration
///
/// # Errors
///
/// Returns an error if the generation model target is invalid
pub fn build_server(config: &altpast_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        GenerateServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize generation server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for generation
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route(GENERATE_PATH, endpoint(generate))
}

/// Handle generation requests
async fn generate(
    State(server): State<Arc<Server>>,
    Json(request): Json<GenerateRequest>,
) -> std::result::Result<Json<GenerateResponse>, ErrorReply> {
    tracing::debug!("generation handler called");

    let response = server.generate(request).await.map_err(|e| server.reply(&e))?;

    Ok(Json(response))
}
