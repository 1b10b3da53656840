use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid RPC base url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc transport failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rpc returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("rpc payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
