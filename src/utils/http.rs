use std::time::Duration;

use futures_util::StreamExt;
use serde::de::DeserializeOwned;

use crate::{RelayError, Result};

pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

pub(crate) fn join_endpoint(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    if base.ends_with(&format!("/{endpoint}")) {
        base.to_string()
    } else {
        format!("{base}/{endpoint}")
    }
}

pub(crate) fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub(crate) async fn response_text_truncated(
    response: reqwest::Response,
    max_bytes: usize,
) -> String {
    let (bytes, truncated) = response_bytes_truncated(response, max_bytes).await;
    let mut body = String::from_utf8_lossy(&bytes).to_string();
    if truncated {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str("...(truncated)");
    }
    body
}

async fn response_bytes_truncated(
    response: reqwest::Response,
    max_bytes: usize,
) -> (Vec<u8>, bool) {
    let max_bytes = max_bytes.max(1);
    let mut out = Vec::<u8>::new();
    let mut truncated = false;

    let mut stream = response.bytes_stream();
    while let Some(next) = stream.next().await {
        let Ok(chunk) = next else {
            break;
        };
        let remaining = max_bytes.saturating_sub(out.len());
        if remaining == 0 {
            truncated = true;
            break;
        }
        if chunk.len() <= remaining {
            out.extend_from_slice(chunk.as_ref());
        } else {
            out.extend_from_slice(&chunk.as_ref()[..remaining]);
            truncated = true;
            break;
        }
    }
    (out, truncated)
}

pub(crate) async fn send_checked(req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
    let response = req.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response_text_truncated(response, MAX_ERROR_BODY_BYTES).await;
        return Err(RelayError::Api { status, body });
    }
    Ok(response)
}

pub(crate) async fn send_checked_json<T: DeserializeOwned>(
    req: reqwest::RequestBuilder,
) -> Result<T> {
    let response = send_checked(req).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice::<T>(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_endpoint_handles_trailing_slashes() {
        assert_eq!(
            join_endpoint("https://api.studio.nebius.com/v1/", "images/generations"),
            "https://api.studio.nebius.com/v1/images/generations"
        );
        assert_eq!(
            join_endpoint("http://localhost:1234/v1", "/images/generations"),
            "http://localhost:1234/v1/images/generations"
        );
    }

    #[test]
    fn join_endpoint_keeps_full_endpoint_urls() {
        assert_eq!(
            join_endpoint("http://proxy/v1/images/generations", "images/generations"),
            "http://proxy/v1/images/generations"
        );
    }
}
