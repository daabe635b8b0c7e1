//! Job creation endpoint.

use crate::job_controller::error::JobError;
use crate::job_controller::service::JobService;
use actix_web::{web, HttpResponse};
use common::requests::JobRequest;
use log::{debug, error};

/// `POST /job`: queues a new job and answers `201 Created` with it.
pub(crate) async fn process(
    service: web::Data<JobService>,
    payload: web::Json<JobRequest>,
) -> Result<HttpResponse, JobError> {
    debug!("Processing job create request");
    let job = service.create(payload.into_inner()).map_err(|e| {
        error!("Service error while creating job: {}", e);
        e
    })?;
    Ok(HttpResponse::Created().json(job))
}
