//! Retention sweeper for terminal jobs.

use super::error::JobError;
use super::service::JobService;
use super::shutdown::Shutdown;
use log::{error, info};
use std::time::Duration;

/// Retention windows after which terminal jobs are dropped from the store.
#[derive(Debug, Clone, Copy)]
pub struct Retention {
    pub finished: Duration,
    pub failed: Duration,
}

/// Periodically removes `Finished` and `Failed` jobs that outlived their
/// retention. Runs alongside the processor on the same store.
pub struct JobCleanup {
    service: JobService,
    interval: Duration,
    retention: Retention,
    shutdown: Shutdown,
}

impl JobCleanup {
    pub fn new(
        service: JobService,
        interval: Duration,
        retention: Retention,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            service,
            interval,
            retention,
            shutdown,
        }
    }

    pub async fn run(self) {
        info!("Job cleanup started");
        while !self.shutdown.is_triggered() {
            self.shutdown.sleep(self.interval).await;
            if self.shutdown.is_triggered() {
                break;
            }
            self.sweep();
        }
        info!("Job cleanup stopped");
    }

    /// One cleanup pass. Returns the number of removed jobs.
    pub fn sweep(&self) -> usize {
        match self
            .service
            .clean_jobs(self.retention.finished, self.retention.failed)
        {
            Ok(removed) => {
                info!("Removed {} jobs in state Finished or Failed", removed);
                removed
            }
            Err(JobError::NotFound(msg)) => {
                info!("{}", msg);
                0
            }
            Err(e) => {
                error!("Job cleanup failed: {}", e);
                0
            }
        }
    }
}
