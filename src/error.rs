use thiserror::Error;

pub type Result<T> = std::result::Result<T, PoolError>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("network error: {0}")]
    Net(#[from] RpcError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("rpc call timed out after {waited_ms}ms: {context}")]
    Timeout { waited_ms: u64, context: String },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("batch returned {got} results, expected {expected}")]
    ResultCount { expected: usize, got: usize },
    #[error("field `{field}` returned malformed data: {reason}")]
    FieldShape { field: String, reason: String },
    #[error("batch return payload did not decode: {0}")]
    Payload(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingConfig(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
