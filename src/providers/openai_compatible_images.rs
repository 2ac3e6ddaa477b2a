use async_trait::async_trait;

use super::openai_images_common;
use super::openai_like;

use crate::image::ImageGenerationModel;
use crate::profile::{DEFAULT_API_KEY_ENV, Env, ProviderConfig};
use crate::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::{RelayError, Result};

#[derive(Clone, Debug)]
pub struct OpenAICompatibleImages {
    client: openai_like::OpenAiLikeClient,
}

impl OpenAICompatibleImages {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: openai_like::OpenAiLikeClient::new(api_key),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.client = self.client.with_http_client(http);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    pub fn from_config(config: &ProviderConfig, env: &Env) -> Result<Self> {
        const DEFAULT_KEYS: &[&str] = &[DEFAULT_API_KEY_ENV];
        Ok(Self {
            client: openai_like::OpenAiLikeClient::from_config(config, env, DEFAULT_KEYS)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url.as_str()
    }
}

#[async_trait]
impl ImageGenerationModel for OpenAICompatibleImages {
    fn provider(&self) -> &str {
        "openai-compatible"
    }

    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        if request.model.trim().is_empty() {
            return Err(RelayError::InvalidRequest(
                "image model is not set".to_string(),
            ));
        }
        openai_images_common::generate_images(&self.client, request).await
    }
}
