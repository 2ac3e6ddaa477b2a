use std::sync::Mutex;

use async_trait::async_trait;

use crate::image::ImageGenerationModel;
use crate::types::{ImageGenerationRequest, ImageGenerationResponse, ImageSource};
use crate::{RelayError, Result};

pub fn should_skip_httpmock() -> bool {
    if can_bind_localhost() {
        return false;
    }
    eprintln!("skipping httpmock test: sandbox forbids binding to localhost");
    true
}

fn can_bind_localhost() -> bool {
    match std::net::TcpListener::bind(("127.0.0.1", 0)) {
        Ok(listener) => {
            drop(listener);
            true
        }
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => false,
        Err(err) => panic!("failed to bind localhost for httpmock tests: {err}"),
    }
}

#[derive(Debug, Clone)]
enum RecordedOutcome {
    Response(ImageGenerationResponse),
    Api { status: u16, body: String },
    Invalid(String),
}

/// In-memory image model that records every request it receives.
#[derive(Debug)]
pub struct RecordingImageModel {
    outcome: RecordedOutcome,
    calls: Mutex<Vec<ImageGenerationRequest>>,
}

impl RecordingImageModel {
    pub fn returning(response: ImageGenerationResponse) -> Self {
        Self {
            outcome: RecordedOutcome::Response(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returning_url(url: impl Into<String>) -> Self {
        Self::returning(ImageGenerationResponse {
            images: vec![ImageSource::Url { url: url.into() }],
            ..ImageGenerationResponse::default()
        })
    }

    pub fn failing_with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: RecordedOutcome::Api {
                status,
                body: body.into(),
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with_message(message: impl Into<String>) -> Self {
        Self {
            outcome: RecordedOutcome::Invalid(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ImageGenerationRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ImageGenerationModel for RecordingImageModel {
    fn provider(&self) -> &str {
        "recording"
    }

    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }
        match &self.outcome {
            RecordedOutcome::Response(response) => Ok(response.clone()),
            RecordedOutcome::Api { status, body } => Err(RelayError::Api {
                status: reqwest::StatusCode::from_u16(*status)
                    .unwrap_or(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
                body: body.clone(),
            }),
            RecordedOutcome::Invalid(message) => {
                Err(RelayError::InvalidResponse(message.clone()))
            }
        }
    }
}
