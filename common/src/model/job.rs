use crate::jobs::{JobStatus, JobType};
use serde::{Deserialize, Serialize};

/// A request to fingerprint (and optionally relocate) one source file.
///
/// Timestamps are RFC3339 strings in UTC. `modified_at` stays empty until the
/// first mutation after creation, and the cleanup sweeper never removes a job
/// whose `modified_at` cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// ULID assigned at creation. Never changes.
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub modified_at: String,
    #[serde(default)]
    pub modified_by: String,
    pub src_url: String,
    /// Filled by the worker for `CreateAndRename` jobs once the copy exists.
    #[serde(default)]
    pub dst_url: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub status: JobStatus,
    /// Content identifier computed by the worker.
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub error_msg: String,
}
