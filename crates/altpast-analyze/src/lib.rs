#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Photo and story analysis producing an image generation prompt

mod error;
mod parse;
mod prompt;
mod provider;
mod server;
mod types;

use std::sync::Arc;

use altpast_core::{ErrorReply, endpoint};
use axum::{Json, Router, extract::State};

pub use error::{AnalyzeError, Result};
pub use server::Server;
pub use types::{AnalysisResult, AnalyzeRequest, AnalyzeResponse};

use server::AnalyzeServerBuilder;

/// Route served by this crate
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Build the analysis server from configuration
pub fn build_server(config: &altpast_config::Config) -> anyhow::Result<Arc<Server>> {
    Ok(Arc::new(AnalyzeServerBuilder::new(config).build()))
}

/// Create the endpoint router for analysis
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route(ANALYZE_PATH, endpoint(analyze))
}

/// Handle analysis requests
async fn analyze(
    State(server): State<Arc<Server>>,
    Json(request): Json<AnalyzeRequest>,
) -> std::result::Result<Json<AnalyzeResponse>, ErrorReply> {
    tracing::debug!("analysis handler called");

    let analysis = server.analyze(request).await.map_err(|e| server.reply(&e))?;

    tracing::debug!(prompt_chars = analysis.prompt.len(), "analysis complete");

    Ok(Json(AnalyzeResponse::from(analysis)))
}
