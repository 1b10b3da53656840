//! Connection settings for the RPC endpoint.

use crate::error::ConfigError;

const ENV_URL: &str = "KAIZEN_RPC_URL";
const ENV_KEY: &str = "KAIZEN_RPC_KEY";
const ENV_TOKEN: &str = "KAIZEN_RPC_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    /// Project root, e.g. `https://xyz.supabase.co`. Trailing slashes are trimmed.
    pub base_url: String,
    /// Public (anon) key sent as the `apikey` header.
    pub api_key: String,
    /// Signed-in user's access token. Falls back to `api_key` for the bearer header.
    pub access_token: Option<String>,
}

impl RpcConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::Missing("base_url"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(base_url));
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }

        Ok(Self {
            base_url,
            api_key,
            access_token: None,
        })
    }

    /// Reads `KAIZEN_RPC_URL`, `KAIZEN_RPC_KEY` and the optional `KAIZEN_RPC_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(ENV_URL).map_err(|_| ConfigError::Missing(ENV_URL))?;
        let key = std::env::var(ENV_KEY).map_err(|_| ConfigError::Missing(ENV_KEY))?;
        let config = Self::new(url, key)?;
        let token = std::env::var(ENV_TOKEN).ok().filter(|t| !t.trim().is_empty());
        Ok(config.with_access_token(token))
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub(crate) fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }

    pub(crate) fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{function}", self.base_url)
    }
}
