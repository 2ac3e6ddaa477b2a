use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::types::ImageGenerationRequest;

pub const FLUX_DEV_MODEL: &str = "black-forest-labs/flux-dev";

/// Generation parameters applied to every relayed prompt. Callers cannot override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPreset {
    pub model: String,
    pub response_extension: String,
    pub width: u32,
    pub height: u32,
    pub num_inference_steps: u32,
    pub negative_prompt: String,
    /// `-1` asks the provider for its own random seed.
    pub seed: i64,
}

impl Default for GenerationPreset {
    fn default() -> Self {
        Self {
            model: FLUX_DEV_MODEL.to_string(),
            response_extension: "webp".to_string(),
            width: 1024,
            height: 1024,
            num_inference_steps: 28,
            negative_prompt: String::new(),
            seed: -1,
        }
    }
}

impl GenerationPreset {
    pub fn extra_body(&self) -> Value {
        json!({
            "response_extension": self.response_extension,
            "width": self.width,
            "height": self.height,
            "num_inference_steps": self.num_inference_steps,
            "negative_prompt": self.negative_prompt,
            "seed": self.seed,
        })
    }

    pub fn to_request(&self, prompt: impl Into<String>) -> ImageGenerationRequest {
        ImageGenerationRequest {
            provider_options: Some(self.extra_body()),
            ..ImageGenerationRequest::new(self.model.as_str(), prompt)
        }
    }
}
