use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    /// The operation's path is malformed (not an array of strings).
    #[error("path error: {0}")]
    Path(String),
    #[error("unsupported operation kind: {0}")]
    UnsupportedOperation(String),
    #[error("request operation under \"{folder}\" requires a name")]
    MissingName { folder: String },
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// A node the merge has to descend into has the wrong shape.
    #[error("document is not a collection tree: {0}")]
    Document(String),
}
