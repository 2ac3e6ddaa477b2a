//! Generation relay: validates a prompt, calls the image provider once with the fixed
//! [`GenerationPreset`], and maps the outcome to the `{ imageUrl }` / `{ error }` wire shape.

mod preset;

#[cfg(feature = "relay")]
pub mod http;

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;

use crate::image::ImageGenerationModel;
use crate::types::{GenerationRequest, GenerationResult};
use crate::{RelayError, Result};

pub use preset::{FLUX_DEV_MODEL, GenerationPreset};

pub const PROMPT_REQUIRED_MESSAGE: &str = "Prompt is required";

/// Status and body produced for one relayed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub status: StatusCode,
    pub result: GenerationResult,
}

impl RelayReply {
    fn ok(image_url: String) -> Self {
        Self {
            status: StatusCode::OK,
            result: GenerationResult::success(image_url),
        }
    }

    fn prompt_required() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            result: GenerationResult::failure(PROMPT_REQUIRED_MESSAGE),
        }
    }

    fn failed(err: &RelayError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            result: GenerationResult::failure(err.to_string()),
        }
    }
}

/// Mirrors JavaScript truthiness for the `prompt` field: absent, `null`, `false`, `0` and
/// `""` count as missing. A `null` body has no fields to read and is an error.
pub fn prompt_from_body(body: &Value) -> Result<Option<&str>> {
    if body.is_null() {
        return Err(RelayError::InvalidRequest(
            "request body must not be null".to_string(),
        ));
    }
    let Some(prompt) = body.get("prompt") else {
        return Ok(None);
    };
    match prompt {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::String(text) if text.is_empty() => Ok(None),
        Value::String(text) => Ok(Some(text.as_str())),
        Value::Number(number) if number.as_f64() == Some(0.0) => Ok(None),
        _ => Err(RelayError::InvalidRequest(
            "prompt must be a string".to_string(),
        )),
    }
}

#[derive(Clone)]
pub struct Relay {
    model: Arc<dyn ImageGenerationModel>,
    preset: GenerationPreset,
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("provider", &self.model.provider())
            .field("preset", &self.preset)
            .finish()
    }
}

impl Relay {
    pub fn new(model: Arc<dyn ImageGenerationModel>) -> Self {
        Self {
            model,
            preset: GenerationPreset::default(),
        }
    }

    pub fn with_preset(mut self, preset: GenerationPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn preset(&self) -> &GenerationPreset {
        &self.preset
    }

    pub async fn generate(&self, request: &GenerationRequest) -> RelayReply {
        if request.prompt.is_empty() {
            return RelayReply::prompt_required();
        }
        self.relay(&request.prompt).await
    }

    /// Handles a raw `POST /api/generate` body. Parse failures surface as 500, like any
    /// other failure past the boundary.
    pub async fn handle_body(&self, body: &[u8]) -> RelayReply {
        let parsed = match serde_json::from_slice::<Value>(body) {
            Ok(parsed) => parsed,
            Err(err) => {
                let err = RelayError::from(err);
                tracing::error!(error = %err, "error generating image");
                return RelayReply::failed(&err);
            }
        };

        match prompt_from_body(&parsed) {
            Ok(Some(prompt)) => self.relay(prompt).await,
            Ok(None) => RelayReply::prompt_required(),
            Err(err) => {
                tracing::error!(error = %err, "error generating image");
                RelayReply::failed(&err)
            }
        }
    }

    async fn relay(&self, prompt: &str) -> RelayReply {
        match self.generate_image_url(prompt).await {
            Ok(url) => RelayReply::ok(url),
            Err(err) => {
                tracing::error!(error = %err, "error generating image");
                RelayReply::failed(&err)
            }
        }
    }

    async fn generate_image_url(&self, prompt: &str) -> Result<String> {
        let request = self.preset.to_request(prompt);
        let response = self.model.generate(request).await?;
        tracing::info!(
            provider = self.model.provider(),
            model = %self.preset.model,
            response = ?response,
            "image generated"
        );

        response.first_url().map(str::to_string).ok_or_else(|| {
            RelayError::InvalidResponse("provider response contains no image url".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{ImageGenerationResponse, ImageSource};
    use crate::utils::test_support::RecordingImageModel;

    fn relay_with(model: RecordingImageModel) -> (Relay, Arc<RecordingImageModel>) {
        let model = Arc::new(model);
        (Relay::new(model.clone()), model)
    }

    #[test]
    fn falsy_prompts_count_as_missing() -> Result<()> {
        for body in [
            json!({}),
            json!({ "prompt": null }),
            json!({ "prompt": false }),
            json!({ "prompt": 0 }),
            json!({ "prompt": 0.0 }),
            json!({ "prompt": "" }),
            json!([1, 2, 3]),
            json!("a red fox"),
        ] {
            assert_eq!(prompt_from_body(&body)?, None, "body: {body}");
        }
        Ok(())
    }

    #[test]
    fn null_body_is_an_error() {
        let err = prompt_from_body(&Value::Null).expect_err("null body");
        assert_eq!(err.to_string(), "request body must not be null");
    }

    #[tokio::test]
    async fn handle_body_reports_null_body_as_500() {
        let (relay, model) = relay_with(RecordingImageModel::returning_url("u"));

        let reply = relay.handle_body(b"null").await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.result,
            GenerationResult::failure("request body must not be null")
        );
        assert_eq!(model.call_count(), 0);
    }

    #[test]
    fn truthy_non_string_prompt_is_rejected() {
        for body in [
            json!({ "prompt": 5 }),
            json!({ "prompt": true }),
            json!({ "prompt": ["a"] }),
        ] {
            assert!(prompt_from_body(&body).is_err(), "body: {body}");
        }
    }

    #[test]
    fn whitespace_prompt_is_forwarded() -> Result<()> {
        let body = json!({ "prompt": "   " });
        assert_eq!(prompt_from_body(&body)?, Some("   "));
        Ok(())
    }

    #[tokio::test]
    async fn generate_returns_first_image_url() {
        let (relay, model) = relay_with(RecordingImageModel::returning(ImageGenerationResponse {
            images: vec![
                ImageSource::Url {
                    url: "https://cdn.example/x.webp".to_string(),
                },
                ImageSource::Url {
                    url: "https://cdn.example/y.webp".to_string(),
                },
            ],
            ..ImageGenerationResponse::default()
        }));

        let reply = relay.generate(&GenerationRequest::new("a red fox")).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.result.image_url(), Some("https://cdn.example/x.webp"));
        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "a red fox");
        assert_eq!(calls[0].model, FLUX_DEV_MODEL);
        assert_eq!(
            calls[0].provider_options,
            Some(GenerationPreset::default().extra_body())
        );
    }

    #[tokio::test]
    async fn empty_prompt_never_reaches_provider() {
        let (relay, model) = relay_with(RecordingImageModel::returning_url("u"));

        let reply = relay.generate(&GenerationRequest::new("")).await;

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.result,
            GenerationResult::failure(PROMPT_REQUIRED_MESSAGE)
        );
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_maps_to_500_with_message() {
        let (relay, model) =
            relay_with(RecordingImageModel::failing_with_status(429, "quota exceeded"));

        let reply = relay.generate(&GenerationRequest::new("a red fox")).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        let GenerationResult::Failure { error } = reply.result else {
            panic!("expected failure");
        };
        assert!(error.contains("quota exceeded"));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn base64_only_response_is_a_failure() {
        let (relay, _model) = relay_with(RecordingImageModel::returning(ImageGenerationResponse {
            images: vec![ImageSource::Base64 {
                media_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            }],
            ..ImageGenerationResponse::default()
        }));

        let reply = relay.generate(&GenerationRequest::new("a red fox")).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn handle_body_reports_invalid_json_as_500() {
        let (relay, model) = relay_with(RecordingImageModel::returning_url("u"));

        let reply = relay.handle_body(b"{not json").await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn repeated_prompts_call_provider_each_time() {
        let (relay, model) = relay_with(RecordingImageModel::returning_url("u"));
        let request = GenerationRequest::new("same prompt");

        let first = relay.generate(&request).await;
        let second = relay.generate(&request).await;

        assert_eq!(first, second);
        assert_eq!(model.call_count(), 2);
    }
}
