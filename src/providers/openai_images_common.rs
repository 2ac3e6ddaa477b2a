use serde::Deserialize;
use serde_json::{Map, Value};

use super::openai_like::OpenAiLikeClient;

use crate::{RelayError, Result};
use crate::types::{ImageGenerationRequest, ImageGenerationResponse, ImageSource, Warning};
use crate::utils::http::send_checked_json;

const RESERVED_BODY_KEYS: &[&str] = &["model", "prompt", "response_format"];

#[derive(Debug, Deserialize)]
struct ImagesGenerationResponse {
    #[serde(default)]
    created: Option<u64>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    data: Vec<ImageGenerationData>,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

pub(super) fn build_request_body(
    request: ImageGenerationRequest,
    warnings: &mut Vec<Warning>,
) -> Map<String, Value> {
    let ImageGenerationRequest {
        prompt,
        model,
        provider_options,
    } = request;

    let mut body = Map::<String, Value>::new();
    body.insert("model".to_string(), Value::String(model));
    body.insert("prompt".to_string(), Value::String(prompt));
    body.insert(
        "response_format".to_string(),
        Value::String("url".to_string()),
    );

    crate::types::merge_provider_options_into_body(
        &mut body,
        provider_options.as_ref(),
        RESERVED_BODY_KEYS,
        "image.provider_options",
        warnings,
    );

    body
}

/// Posts to `images/generations`. `images` keeps the provider's `data` order; an item with
/// neither `url` nor `b64_json` fails the whole response.
pub(super) async fn generate_images(
    client: &OpenAiLikeClient,
    request: ImageGenerationRequest,
) -> Result<ImageGenerationResponse> {
    let model = request.model.clone();
    let mut warnings = Vec::<Warning>::new();
    let body = build_request_body(request, &mut warnings);

    let url = client.endpoint("images/generations");
    let parsed: ImagesGenerationResponse =
        send_checked_json(client.apply_auth(client.http.post(url)).json(&body)).await?;

    let mut images = Vec::<ImageSource>::new();
    let mut revised_prompts = Vec::<String>::new();
    for (index, item) in parsed.data.into_iter().enumerate() {
        if let Some(prompt) = item
            .revised_prompt
            .as_deref()
            .filter(|v| !v.trim().is_empty())
        {
            revised_prompts.push(prompt.to_string());
        }

        if let Some(url) = item.url.as_deref().filter(|v| !v.trim().is_empty()) {
            images.push(ImageSource::Url {
                url: url.to_string(),
            });
            continue;
        }
        if let Some(data) = item.b64_json.as_deref().filter(|v| !v.trim().is_empty()) {
            images.push(ImageSource::Base64 {
                media_type: "image/png".to_string(),
                data: data.to_string(),
            });
            continue;
        }

        return Err(RelayError::InvalidResponse(format!(
            "image item {index} is missing both url and b64_json"
        )));
    }

    let mut provider_metadata = Map::<String, Value>::new();
    provider_metadata.insert("model".to_string(), Value::String(model));
    if let Some(created) = parsed.created {
        provider_metadata.insert("created".to_string(), Value::Number(created.into()));
    }
    if let Some(id) = parsed.id.filter(|id| !id.trim().is_empty()) {
        provider_metadata.insert("id".to_string(), Value::String(id));
    }
    if !revised_prompts.is_empty() {
        provider_metadata.insert(
            "revised_prompts".to_string(),
            Value::Array(revised_prompts.into_iter().map(Value::String).collect()),
        );
    }

    Ok(ImageGenerationResponse {
        images,
        warnings,
        provider_metadata: Some(Value::Object(provider_metadata)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_flattens_provider_options() {
        let mut warnings = Vec::new();
        let request = ImageGenerationRequest {
            provider_options: Some(json!({
                "width": 1024,
                "negative_prompt": "",
                "prompt": "ignored",
                "response_format": "b64_json"
            })),
            ..ImageGenerationRequest::new("black-forest-labs/flux-dev", "a red fox")
        };

        let body = build_request_body(request, &mut warnings);

        assert_eq!(
            Value::Object(body),
            json!({
                "model": "black-forest-labs/flux-dev",
                "prompt": "a red fox",
                "response_format": "url",
                "width": 1024,
                "negative_prompt": ""
            })
        );
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn request_body_without_options_has_no_warnings() {
        let mut warnings = Vec::new();
        let body = build_request_body(ImageGenerationRequest::new("m", "hi"), &mut warnings);
        assert_eq!(body.len(), 3);
        assert!(warnings.is_empty());
    }
}
