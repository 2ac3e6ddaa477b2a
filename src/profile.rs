mod auth;
mod config;
mod env;

pub(crate) use auth::{HttpAuth, resolve_api_key};
pub use config::{
    DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_LISTEN, ProviderConfig, RelayConfig,
};
pub use env::{Env, parse_dotenv};
