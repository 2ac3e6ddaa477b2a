use async_trait::async_trait;

use crate::Result;
use crate::types::{ImageGenerationRequest, ImageGenerationResponse};

/// Upstream image backend the relay forwards prompts to.
///
/// `generate` makes exactly one upstream call; the relay never retries.
#[async_trait]
pub trait ImageGenerationModel: Send + Sync {
    /// Short name used in logs, e.g. `openai-compatible`.
    fn provider(&self) -> &str;

    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse>;
}
