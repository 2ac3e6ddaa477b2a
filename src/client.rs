//! Generation client: talks to a running relay and keeps the view state a front-end renders.

mod view;

use serde::Deserialize;

use crate::types::{GENERATION_FAILED_MESSAGE, GenerationRequest};
use crate::utils::http::{default_http_client, join_endpoint};
use crate::{RelayError, Result};

pub use view::{GeneratorView, Notification, PROMPT_VALIDATION_MESSAGE};

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Deserialize)]
struct RelayResponseBody {
    #[serde(default, rename = "imageUrl")]
    image_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RelayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for RelayClient {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_URL)
    }
}

impl RelayClient {
    pub fn new(relay_url: impl AsRef<str>) -> Self {
        Self {
            http: default_http_client(),
            endpoint: join_endpoint(relay_url.as_ref(), "api/generate"),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Sends one generation request. A non-2xx reply becomes [`RelayError::Rejected`]
    /// carrying the relay's `error` field.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let parsed = serde_json::from_slice::<RelayResponseBody>(&body)?;

        if !status.is_success() {
            let message = parsed
                .error
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| GENERATION_FAILED_MESSAGE.to_string());
            return Err(RelayError::Rejected(message));
        }

        parsed.image_url.ok_or_else(|| {
            RelayError::InvalidResponse("relay response is missing imageUrl".to_string())
        })
    }
}
