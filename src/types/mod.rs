use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message used whenever a failure carries no message of its own.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Url { url: String },
    Base64 { media_type: String, data: String },
}

impl ImageSource {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url { url } => Some(url.as_str()),
            Self::Base64 { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Warning {
    Unsupported {
        feature: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    Compatibility {
        feature: String,
        details: String,
    },
}

/// One upstream image generation call. The provider is always asked for URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub model: String,
    /// Extra top-level fields merged into the provider request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_options: Option<Value>,
}

impl ImageGenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            provider_options: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub images: Vec<ImageSource>,
    #[serde(default)]
    pub warnings: Vec<Warning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<Value>,
}

impl ImageGenerationResponse {
    /// URL of the provider's first image. Later images are never considered.
    pub fn first_url(&self) -> Option<&str> {
        self.images.first().and_then(ImageSource::url)
    }
}

/// Body accepted by `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Body returned by `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Success {
        #[serde(rename = "imageUrl")]
        image_url: String,
    },
    Failure {
        error: String,
    },
}

impl GenerationResult {
    pub fn success(image_url: impl Into<String>) -> Self {
        Self::Success {
            image_url: image_url.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        if error.trim().is_empty() {
            return Self::Failure {
                error: GENERATION_FAILED_MESSAGE.to_string(),
            };
        }
        Self::Failure { error }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Success { image_url } => Some(image_url.as_str()),
            Self::Failure { .. } => None,
        }
    }
}

pub(crate) fn merge_provider_options_into_body(
    body: &mut Map<String, Value>,
    provider_options: Option<&Value>,
    reserved_keys: &[&str],
    feature: &str,
    warnings: &mut Vec<Warning>,
) {
    let Some(options) = provider_options else {
        return;
    };
    let Some(options) = options.as_object() else {
        warnings.push(Warning::Unsupported {
            feature: feature.to_string(),
            details: Some("provider options must be a JSON object".to_string()),
        });
        return;
    };

    for (key, value) in options {
        if reserved_keys.contains(&key.as_str()) {
            warnings.push(Warning::Compatibility {
                feature: format!("{feature}.{key}"),
                details: format!("{key} is set by the request and cannot be overridden"),
            });
            continue;
        }
        body.insert(key.clone(), value.clone());
    }
}
