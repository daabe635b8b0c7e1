//! Full (`PUT`) and partial (`PATCH`) job updates.
//!
//! Both are refused with `409` once the job has left `Created`.

use super::parse_job_id;
use crate::job_controller::error::JobError;
use crate::job_controller::service::JobService;
use actix_web::{web, HttpResponse};
use common::requests::JobRequest;
use log::{debug, error};

/// `PUT /job/{job_id}`: replaces every mutable field.
pub(crate) async fn process_full(
    job_id: web::Path<String>,
    service: web::Data<JobService>,
    payload: web::Json<JobRequest>,
) -> Result<HttpResponse, JobError> {
    update(&job_id, &service, payload.into_inner(), false)
}

/// `PATCH /job/{job_id}`: only non-blank fields replace stored values.
pub(crate) async fn process_partial(
    job_id: web::Path<String>,
    service: web::Data<JobService>,
    payload: web::Json<JobRequest>,
) -> Result<HttpResponse, JobError> {
    update(&job_id, &service, payload.into_inner(), true)
}

fn update(
    raw_id: &str,
    service: &JobService,
    input: JobRequest,
    partial: bool,
) -> Result<HttpResponse, JobError> {
    debug!("Processing job update request (partial: {})", partial);
    let job_id = parse_job_id(raw_id)?;
    let job = service.update(&job_id, input, partial).map_err(|e| {
        error!("Service error while updating job {}: {}", job_id, e);
        e
    })?;
    Ok(HttpResponse::Ok().json(job))
}
