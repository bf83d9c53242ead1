use std::path::PathBuf;

use collection_merge::MergeError;
use collection_patch::PatchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode JSON: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("missing configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Merge(#[from] MergeError),
}
