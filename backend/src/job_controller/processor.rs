//! # Job Processor
//!
//! The single consumer of the job queue. Each pass of the loop:
//!
//! 1.  Asks `JobService::get_next` for the oldest job still in `Created`.
//! 2.  Runs the `FileProvider` on tokio's blocking pool with the job's source
//!     locator, renaming when the job type asks for it. No store lock is held
//!     during the call.
//! 3.  On success records the content identifier (and destination for renames),
//!     then moves the job to `Finished`. On failure records the reason, then
//!     moves the job to `Failed`.
//! 4.  When no job is eligible, sleeps for the configured backoff.
//!
//! Every write in step 3 is best-effort: a failure is logged and the loop moves
//! on. The field write and the status write are separate store calls, so a
//! concurrent HTTP request can observe or modify the job between them.
//!
//! The shutdown flag is checked at the top of each pass. A provider call that has
//! already started always completes, and its outcome is recorded, before the
//! loop exits.

use super::error::JobError;
use super::service::JobService;
use super::shutdown::Shutdown;
use crate::providers::{FileProvider, ProcessedFile, ProviderError};
use common::jobs::JobStatus;
use common::model::job::Job;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;

pub struct JobProcessor {
    service: JobService,
    provider: Arc<dyn FileProvider>,
    no_job_wait: Duration,
    shutdown: Shutdown,
}

impl JobProcessor {
    pub fn new(
        service: JobService,
        provider: Arc<dyn FileProvider>,
        no_job_wait: Duration,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            service,
            provider,
            no_job_wait,
            shutdown,
        }
    }

    pub async fn run(self) {
        info!("Job processor started");
        while !self.shutdown.is_triggered() {
            match self.service.get_next() {
                Ok(job) => self.process(job).await,
                Err(JobError::NotFound(_)) => {
                    debug!("no job found. Sleeping...");
                    self.shutdown.sleep(self.no_job_wait).await;
                }
                Err(e) => {
                    error!("Could not fetch next job: {}", e);
                    self.shutdown.sleep(self.no_job_wait).await;
                }
            }
        }
        info!("Job processor stopped");
    }

    async fn process(&self, job: Job) {
        info!("Found job with Id {} to process", job.id);
        let rename = job.job_type.requires_rename();
        let provider = Arc::clone(&self.provider);
        let src_url = job.src_url.clone();

        let outcome = tokio::task::spawn_blocking(move || provider.process_file(&src_url, rename))
            .await
            .unwrap_or_else(|e| Err(ProviderError::Internal(format!("Task join error: {}", e))));

        match outcome {
            Ok(file) => self.record_success(&job.id, file, rename),
            Err(e) => self.record_failure(&job.id, e),
        }
        info!("Done processing job with Id {}", job.id);
    }

    fn record_success(&self, job_id: &str, file: ProcessedFile, rename: bool) {
        if let Err(e) = self.service.set_file_id(job_id, &file.file_id) {
            error!("could not set file id for job {}: {}", job_id, e);
        }
        if rename {
            match file.dst_url {
                Some(dst_url) => {
                    if let Err(e) = self.service.set_dst_url(job_id, &dst_url) {
                        error!("could not set destination Url for job {}: {}", job_id, e);
                    }
                }
                None => error!("provider returned no destination for job {}", job_id),
            }
        }
        self.set_status(job_id, JobStatus::Finished);
    }

    fn record_failure(&self, job_id: &str, cause: ProviderError) {
        let cause = JobError::from(cause);
        error!(
            "could not process file for job {} ({}): {}",
            job_id,
            cause.kind(),
            cause
        );
        let message = format!("Could not process file: {}", cause);
        if let Err(e) = self.service.set_err_msg(job_id, &message) {
            error!("could not set error message for job {}: {}", job_id, e);
        }
        self.set_status(job_id, JobStatus::Failed);
    }

    fn set_status(&self, job_id: &str, status: JobStatus) {
        if let Err(e) = self.service.change_status(job_id, status.as_str()) {
            error!("could not change status of job {} to {}: {}", job_id, status, e);
        }
    }
}
