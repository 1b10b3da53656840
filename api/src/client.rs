//! HTTP client for PostgREST-style `rest/v1/rpc/<function>` calls.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::RpcConfig;
use crate::error::RpcError;
use crate::notebook::{NotebookRpc, NotebookSnapshot, ENSURE_DEFAULT_AND_COUNTS};

#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    config: RpcConfig,
}

impl RpcClient {
    pub fn new(config: RpcConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self, RpcError> {
        Ok(Self::new(RpcConfig::from_env()?))
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Invoke `function` with named arguments. A `null` or empty body decodes to `None`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        function: &str,
        args: &Value,
    ) -> Result<Option<T>, RpcError> {
        let url = self.config.rpc_url(function);
        debug!(target: "kaizen::api::rpc", %function, "invoking rpc");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.config.bearer())
            .json(args)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                target: "kaizen::api::rpc",
                %function,
                status = status.as_u16(),
                "rpc call rejected"
            );
            return Err(RpcError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(serde_json::from_str::<Option<T>>(&body)?)
    }
}

impl NotebookRpc for RpcClient {
    async fn ensure_default_and_counts(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> Result<Option<NotebookSnapshot>, RpcError> {
        let args = json!({
            "p_user_id": user_id,
            "p_org_id": org_id,
        });
        self.call(ENSURE_DEFAULT_AND_COUNTS, &args).await
    }
}
