use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("api error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("{0}")]
    Rejected(String),
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = RelayError::Api {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "api error (401 Unauthorized): bad key");
    }

    #[test]
    fn rejected_error_displays_relay_message_verbatim() {
        let err = RelayError::Rejected("Prompt is required".to_string());
        assert_eq!(err.to_string(), "Prompt is required");
    }
}
