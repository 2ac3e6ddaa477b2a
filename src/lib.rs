//! Prompt-to-image relay: an HTTP endpoint that forwards prompts to an OpenAI-compatible
//! image provider, plus the client that drives it.

mod error;
pub mod image;
pub mod observability;
pub mod profile;
pub mod providers;
pub mod types;
pub mod utils;

#[cfg(feature = "client")]
pub mod client;
pub mod relay;

pub use error::{RelayError, Result};
pub use image::ImageGenerationModel;
pub use profile::{Env, ProviderConfig, RelayConfig};
pub use providers::OpenAICompatibleImages;
pub use relay::{GenerationPreset, Relay, RelayReply};
pub use types::{
    GenerationRequest, GenerationResult, ImageGenerationRequest, ImageGenerationResponse,
    ImageSource, Warning,
};

#[cfg(feature = "client")]
pub use client::{GeneratorView, Notification, RelayClient};
