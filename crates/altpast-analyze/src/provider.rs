pub(crate) mod openai;

use async_trait::async_trait;

use crate::types::VisionRequest;

/// Trait for multimodal completion providers
#[async_trait]
pub(crate) trait VisionProvider: Send + Sync {
    /// Return the text of the first completion choice
    async fn complete(&self, request: VisionRequest) -> crate::error::Result<String>;
}
