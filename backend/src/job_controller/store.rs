//! In-memory job store.
//!
//! `JobStore` owns the only copy of every job and the lock that guards them.
//! Callers never see a reference into the map: reads hand out clones, and
//! every mutation takes the write lock once, edits a copy of the stored record
//! and writes the copy back before the lock is released. Nothing here performs
//! I/O, so the lock is never held across a file provider call.
//!
//! The store has no business rules beyond the few value checks that belong to
//! a single field (a blank file id is never a valid file id). Status gating and
//! input validation live in `JobService`.

use super::error::JobError;
use chrono::{DateTime, SecondsFormat, Utc};
use common::jobs::JobStatus;
use common::model::job::Job;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

/// Current UTC time in the format used for every job timestamp.
pub fn now_utc_string() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, job_id: &str) -> Result<Job, JobError> {
        self.jobs
            .read()
            .get(job_id)
            .cloned()
            .ok_or_else(|| missing(job_id))
    }

    /// Inserts or replaces the job stored under `job.id`.
    ///
    /// With `overwrite == false` an existing entry is left alone and the call
    /// fails with `BadRequest`.
    pub fn save(&self, job: Job, overwrite: bool) -> Result<Job, JobError> {
        let mut jobs = self.jobs.write();
        if !overwrite && jobs.contains_key(&job.id) {
            return Err(JobError::bad_request(format!(
                "job with Id {} already exists",
                job.id
            )));
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    pub fn delete(&self, job_id: &str) -> Result<(), JobError> {
        self.jobs
            .write()
            .remove(job_id)
            .map(|_| ())
            .ok_or_else(|| missing(job_id))
    }

    /// Returns the oldest job still waiting in `Created`.
    ///
    /// Age is taken from `created_at`; equal timestamps fall back to the
    /// smaller id. A `created_at` that does not parse counts as oldest.
    pub fn get_next(&self) -> Result<Job, JobError> {
        let jobs = self.jobs.read();
        if jobs.is_empty() {
            return Err(JobError::not_found("no jobs in list"));
        }
        jobs.values()
            .filter(|job| job.status == JobStatus::Created)
            .min_by(|a, b| queue_order(a, b))
            .cloned()
            .ok_or_else(|| JobError::not_found("no job in status created"))
    }

    /// Sets the status by name, matched case-insensitively.
    ///
    /// Setting the status a job already has succeeds without touching
    /// `modified_at`.
    pub fn change_status(&self, job_id: &str, new_status: &str) -> Result<(), JobError> {
        self.modify(job_id, |job| {
            let status: JobStatus = new_status
                .parse()
                .map_err(|_| JobError::bad_request("invalid status value"))?;
            if job.status == status {
                return Ok(false);
            }
            job.status = status;
            Ok(true)
        })
        .map(|_| ())
    }

    pub fn set_file_id(&self, job_id: &str, file_id: &str) -> Result<(), JobError> {
        self.modify(job_id, |job| {
            if file_id.trim().is_empty() {
                return Err(JobError::bad_request("invalid file id"));
            }
            job.file_id = file_id.to_string();
            Ok(true)
        })
        .map(|_| ())
    }

    pub fn set_dst_url(&self, job_id: &str, dst_url: &str) -> Result<(), JobError> {
        self.modify(job_id, |job| {
            if dst_url.trim().is_empty() {
                return Err(JobError::bad_request("invalid destination Url"));
            }
            job.dst_url = dst_url.to_string();
            Ok(true)
        })
        .map(|_| ())
    }

    pub fn set_err_msg(&self, job_id: &str, err_msg: &str) -> Result<(), JobError> {
        self.modify(job_id, |job| {
            job.error_msg = err_msg.to_string();
            Ok(true)
        })
        .map(|_| ())
    }

    /// Removes terminal jobs whose last modification is older than the
    /// retention configured for their status. Returns how many were removed.
    ///
    /// Jobs with an unparsable `modified_at` are kept.
    pub fn clean_jobs(
        &self,
        finished_retention: Duration,
        failed_retention: Duration,
    ) -> Result<usize, JobError> {
        let mut jobs = self.jobs.write();
        if jobs.is_empty() {
            return Err(JobError::not_found("no jobs in list"));
        }
        let now = Utc::now();
        let before = jobs.len();
        jobs.retain(|_, job| {
            if !job.status.is_terminal() {
                return true;
            }
            let retention = if job.status == JobStatus::Failed {
                failed_retention
            } else {
                finished_retention
            };
            let Some(modified_at) = parse_timestamp(&job.modified_at) else {
                return true;
            };
            // A negative age (clock skew) fails the conversion and keeps the job.
            match now.signed_duration_since(modified_at).to_std() {
                Ok(age) => age <= retention,
                Err(_) => true,
            }
        });
        Ok(before - jobs.len())
    }

    /// Every stored job, oldest first.
    pub fn get_all(&self) -> Result<Vec<Job>, JobError> {
        let jobs = self.jobs.read();
        if jobs.is_empty() {
            return Err(JobError::not_found("no jobs in list"));
        }
        let mut all: Vec<Job> = jobs.values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(all)
    }

    /// Applies `edit` to a copy of the stored job and writes the copy back,
    /// all under one write lock, so checks made inside `edit` still hold when
    /// the copy lands. `edit` returns whether anything changed; `modified_at` is
    /// refreshed only when it did. Returns the job as stored afterwards.
    pub fn modify<F>(&self, job_id: &str, edit: F) -> Result<Job, JobError>
    where
        F: FnOnce(&mut Job) -> Result<bool, JobError>,
    {
        let mut jobs = self.jobs.write();
        let mut job = jobs.get(job_id).cloned().ok_or_else(|| missing(job_id))?;
        if edit(&mut job)? {
            job.modified_at = now_utc_string();
            jobs.insert(job.id.clone(), job.clone());
        }
        Ok(job)
    }
}

fn queue_order(a: &Job, b: &Job) -> Ordering {
    let created = |job: &Job| parse_timestamp(&job.created_at).unwrap_or(DateTime::<Utc>::MIN_UTC);
    created(a)
        .cmp(&created(b))
        .then_with(|| a.id.cmp(&b.id))
}

fn missing(job_id: &str) -> JobError {
    JobError::not_found(format!("job with Id {} does not exist", job_id))
}
