use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LunaError {
    #[error("Acquisition failed for {source_name}: {reason}")]
    Acquisition { source_name: String, reason: String },

    #[error("Cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Model service failed: {reason}")]
    Service { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },
}

pub type Result<T> = std::result::Result<T, LunaError>;
