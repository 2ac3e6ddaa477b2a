use crate::Result;
use crate::profile::{Env, HttpAuth, ProviderConfig, resolve_api_key};
use crate::utils::http::{default_http_client, join_endpoint};

pub(crate) fn auth_from_api_key(api_key: &str) -> Option<HttpAuth> {
    if api_key.trim().is_empty() {
        return None;
    }
    HttpAuth::bearer(api_key).ok()
}

/// Shared plumbing for OpenAI-shaped HTTP APIs: base url and bearer auth.
#[derive(Clone, Debug)]
pub(crate) struct OpenAiLikeClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) auth: Option<HttpAuth>,
}

impl OpenAiLikeClient {
    pub(crate) fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            http: default_http_client(),
            base_url: crate::profile::DEFAULT_BASE_URL.to_string(),
            auth: auth_from_api_key(&api_key),
        }
    }

    pub(crate) fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn from_config(
        config: &ProviderConfig,
        env: &Env,
        default_keys: &[&str],
    ) -> Result<Self> {
        let api_key = resolve_api_key(&config.api_key_env, env, default_keys)?;
        Ok(Self {
            http: default_http_client(),
            base_url: config.resolve_base_url(env),
            auth: Some(HttpAuth::bearer(&api_key)?),
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        join_endpoint(&self.base_url, path)
    }

    pub(crate) fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth.as_ref() {
            Some(auth) => auth.apply(req),
            None => req,
        }
    }
}
