//! Business rules on top of `JobStore`.
//!
//! `JobService` validates client input, fills defaults on creation and refuses
//! mutations that the job's status does not allow. The accessors used by the
//! background loops (`get_next`, `change_status`, the field setters,
//! `clean_jobs`, `get_all`) forward to the store unchanged.
//!
//! `update` checks the status and writes under the same store lock. `delete`
//! reads first and removes second; a job deleted between the two steps is
//! reported as not found.

use super::error::JobError;
use super::store::{now_utc_string, JobStore};
use common::jobs::{JobStatus, JobType};
use common::model::job::Job;
use common::requests::JobRequest;
use std::sync::Arc;
use std::time::Duration;
use ulid::Ulid;

/// Cheap to clone; every clone shares the same store.
#[derive(Clone)]
pub struct JobService {
    store: Arc<JobStore>,
}

impl JobService {
    pub fn new(store: Arc<JobStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, input: JobRequest) -> Result<Job, JobError> {
        let job_type = validate(&input)?;
        let now = now_utc_string();
        let name = if input.name.trim().is_empty() {
            format!("Job @ {}", now)
        } else {
            input.name
        };
        let dst_url = if job_type.requires_rename() {
            input.dst_url
        } else {
            String::new()
        };

        let job = Job {
            id: Ulid::new().to_string(),
            name,
            created_at: now,
            created_by: String::new(),
            modified_at: String::new(),
            modified_by: String::new(),
            src_url: input.src_url,
            dst_url,
            job_type,
            status: JobStatus::Created,
            file_id: String::new(),
            error_msg: String::new(),
        };
        self.store.save(job, false)
    }

    pub fn get(&self, job_id: &str) -> Result<Job, JobError> {
        self.store.get(job_id)
    }

    pub fn delete(&self, job_id: &str) -> Result<(), JobError> {
        let job = self.store.get(job_id)?;
        if job.status == JobStatus::Running {
            return Err(JobError::conflict("Cannot delete job in status running"));
        }
        self.store.delete(job_id)
    }

    /// Replaces (`partial == false`) or merges (`partial == true`) the mutable
    /// fields of a job that is still `Created`.
    ///
    /// On a merge, blank input fields keep the stored value. A full update is
    /// validated like a creation request before anything is written.
    pub fn update(&self, job_id: &str, input: JobRequest, partial: bool) -> Result<Job, JobError> {
        // Status check and write share one store lock, so a job the worker has
        // just finished or a DELETE has just removed is never written back.
        self.store.modify(job_id, |current| {
            if current.status != JobStatus::Created {
                return Err(JobError::conflict(
                    "Cannot modify job in status other than created",
                ));
            }

            let job_type = if partial {
                if input.job_type.trim().is_empty() {
                    current.job_type
                } else {
                    parse_job_type(&input.job_type)?
                }
            } else {
                validate(&input)?
            };

            let merge = |incoming: String, stored: &mut String| {
                if !(partial && incoming.trim().is_empty()) {
                    *stored = incoming;
                }
            };
            merge(input.name, &mut current.name);
            merge(input.src_url, &mut current.src_url);
            merge(input.dst_url, &mut current.dst_url);
            current.job_type = job_type;
            Ok(true)
        })
    }

    pub fn get_next(&self) -> Result<Job, JobError> {
        self.store.get_next()
    }

    pub fn change_status(&self, job_id: &str, new_status: &str) -> Result<(), JobError> {
        self.store.change_status(job_id, new_status)
    }

    pub fn set_file_id(&self, job_id: &str, file_id: &str) -> Result<(), JobError> {
        self.store.set_file_id(job_id, file_id)
    }

    pub fn set_dst_url(&self, job_id: &str, dst_url: &str) -> Result<(), JobError> {
        self.store.set_dst_url(job_id, dst_url)
    }

    pub fn set_err_msg(&self, job_id: &str, err_msg: &str) -> Result<(), JobError> {
        self.store.set_err_msg(job_id, err_msg)
    }

    pub fn clean_jobs(
        &self,
        finished_retention: Duration,
        failed_retention: Duration,
    ) -> Result<usize, JobError> {
        self.store.clean_jobs(finished_retention, failed_retention)
    }

    pub fn get_all(&self) -> Result<Vec<Job>, JobError> {
        self.store.get_all()
    }
}

fn parse_job_type(raw: &str) -> Result<JobType, JobError> {
    raw.parse()
        .map_err(|_| JobError::bad_request("invalid job type"))
}

fn validate(input: &JobRequest) -> Result<JobType, JobError> {
    let job_type = parse_job_type(&input.job_type)?;
    if input.src_url.trim().is_empty() {
        return Err(JobError::bad_request("invalid source Url"));
    }
    if job_type.requires_rename() && input.dst_url.trim().is_empty() {
        return Err(JobError::bad_request("invalid destination Url"));
    }
    Ok(job_type)
}
