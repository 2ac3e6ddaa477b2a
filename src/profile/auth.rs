use reqwest::header::{HeaderName, HeaderValue};

use crate::{RelayError, Result};

use super::env::Env;

#[derive(Clone)]
pub(crate) struct HttpAuth {
    pub(crate) header: HeaderName,
    pub(crate) value: HeaderValue,
}

impl std::fmt::Debug for HttpAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuth")
            .field("header", &self.header)
            .field("value", &"<redacted>")
            .finish()
    }
}

impl HttpAuth {
    pub(crate) fn bearer(token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
            RelayError::Config(format!("invalid api key for authorization header: {err}"))
        })?;
        value.set_sensitive(true);

        Ok(Self {
            header: reqwest::header::AUTHORIZATION,
            value,
        })
    }

    pub(crate) fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header(self.header.clone(), self.value.clone())
    }
}

/// Returns the first non-blank value among `keys`, falling back to `default_keys`
/// when `keys` is empty.
pub(crate) fn resolve_api_key(keys: &[String], env: &Env, default_keys: &[&str]) -> Result<String> {
    let candidates: Vec<&str> = if keys.is_empty() {
        default_keys.to_vec()
    } else {
        keys.iter().map(String::as_str).collect()
    };

    for key in &candidates {
        if let Some(value) = env.get(key) {
            return Ok(value);
        }
    }

    Err(RelayError::Config(format!(
        "missing api key env (tried: {})",
        candidates.join(", ")
    )))
}
