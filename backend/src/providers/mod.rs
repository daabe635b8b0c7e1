//! Access to the files that jobs point at.
//!
//! The job processor only knows the `FileProvider` trait. `LocalFileProvider`
//! serves `file://` locators and bare paths from the local filesystem.

mod local;

use crate::job_controller::error::JobError;

pub use local::LocalFileProvider;

/// Outcome of a successful `FileProvider::process_file` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    /// Content identifier derived from the file bytes.
    pub file_id: String,
    /// Where the renamed copy now lives. Only set when renaming was requested.
    pub dst_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The source could not be opened.
    #[error("{0}")]
    NotFound(String),
    /// The locator is malformed or points somewhere this provider cannot reach.
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

/// Computes the content identifier of a source file and, if asked, places a
/// copy of it named after that identifier.
///
/// Implementations block; callers on an async runtime should move the call
/// onto a blocking thread.
pub trait FileProvider: Send + Sync {
    fn process_file(&self, src_url: &str, rename: bool) -> Result<ProcessedFile, ProviderError>;
}

impl From<ProviderError> for JobError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(msg) => JobError::not_found(msg),
            ProviderError::BadRequest(msg) => JobError::bad_request(msg),
            ProviderError::Internal(msg) => JobError::internal(msg),
        }
    }
}
