use crate::types::GenerationRequest;
use crate::{RelayError, Result};

use super::RelayClient;

pub const PROMPT_VALIDATION_MESSAGE: &str = "Please enter a prompt";

/// Error toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
        }
    }

    fn from_relay_error(err: &RelayError) -> Self {
        match err {
            RelayError::Rejected(message) => Self::error(message.clone()),
            other => Self::error(other.to_string()),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// View state owned by a single generator screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorView {
    prompt: String,
    image_url: Option<String>,
    loading: bool,
}

impl GeneratorView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Blank prompts produce a validation notification and leave state untouched.
    /// Otherwise marks the view in flight and returns the request to send.
    pub fn begin_submit(&mut self) -> std::result::Result<GenerationRequest, Notification> {
        if self.prompt.trim().is_empty() {
            return Err(Notification::error(PROMPT_VALIDATION_MESSAGE));
        }
        self.loading = true;
        Ok(GenerationRequest::new(self.prompt.clone()))
    }

    /// Applies a relay outcome. Failures keep the previous image.
    pub fn finish_submit(&mut self, outcome: Result<String>) -> Option<Notification> {
        self.loading = false;
        match outcome {
            Ok(image_url) => {
                self.image_url = Some(image_url);
                None
            }
            Err(err) => {
                tracing::debug!(error = %err, "generation request failed");
                Some(Notification::from_relay_error(&err))
            }
        }
    }

    pub async fn submit(&mut self, client: &RelayClient) -> Option<Notification> {
        let request = match self.begin_submit() {
            Ok(request) => request,
            Err(notification) => return Some(notification),
        };
        let outcome = client.generate(&request).await;
        self.finish_submit(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prompt_is_rejected_without_loading() {
        let mut view = GeneratorView::new();
        view.set_prompt(" \n\t ");

        let notification = view.begin_submit().expect_err("blank prompt");

        assert_eq!(notification.description, PROMPT_VALIDATION_MESSAGE);
        assert_eq!(notification.title, "Error");
        assert!(!view.is_loading());
    }

    #[test]
    fn begin_submit_sends_untrimmed_prompt() {
        let mut view = GeneratorView::new();
        view.set_prompt("  a red fox ");

        let request = view.begin_submit().expect("valid prompt");

        assert_eq!(request.prompt, "  a red fox ");
        assert!(view.is_loading());
    }

    #[test]
    fn success_replaces_image_and_clears_loading() {
        let mut view = GeneratorView::new();
        view.set_prompt("a red fox");
        view.begin_submit().expect("valid prompt");

        let notification = view.finish_submit(Ok("https://cdn.example/x.webp".to_string()));

        assert_eq!(notification, None);
        assert_eq!(view.image_url(), Some("https://cdn.example/x.webp"));
        assert!(!view.is_loading());
    }

    #[test]
    fn failure_keeps_previous_image() {
        let mut view = GeneratorView::new();
        view.set_prompt("a red fox");
        view.begin_submit().expect("valid prompt");
        view.finish_submit(Ok("https://cdn.example/first.webp".to_string()));

        view.begin_submit().expect("valid prompt");
        let notification = view
            .finish_submit(Err(RelayError::Rejected("quota exceeded".to_string())))
            .expect("failure notifies");

        assert_eq!(notification.title, "Error");
        assert_eq!(notification.description, "quota exceeded");
        assert_eq!(view.image_url(), Some("https://cdn.example/first.webp"));
        assert!(!view.is_loading());
    }

    #[test]
    fn overlapping_submissions_let_last_response_win() {
        let mut view = GeneratorView::new();
        view.set_prompt("first");
        view.begin_submit().expect("first request");
        view.set_prompt("second");
        view.begin_submit().expect("second request");

        view.finish_submit(Ok("https://cdn.example/second.webp".to_string()));
        view.finish_submit(Ok("https://cdn.example/first.webp".to_string()));

        assert_eq!(view.image_url(), Some("https://cdn.example/first.webp"));
        assert!(!view.is_loading());
    }

    #[test]
    fn notification_display_uses_title_and_description() {
        let notification = Notification::error("Please enter a prompt");
        assert_eq!(notification.to_string(), "Error: Please enter a prompt");
    }
}
