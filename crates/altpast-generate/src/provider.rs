pub(crate) mod replicate;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::types::Prediction;

/// Trait for asynchronous image generation services
#[async_trait]
pub(crate) trait PredictionProvider: Send + Sync {
    /// Submit a job with the given model input
    async fn create_prediction(&self, input: Map<String, Value>) -> crate::error::Result<Prediction>;

    /// Fetch the current state of a job
    async fn get_prediction(&self, id: &str) -> crate::error::Result<Prediction>;
}
