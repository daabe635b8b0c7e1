//! Single job lookup.

use super::parse_job_id;
use crate::job_controller::error::JobError;
use crate::job_controller::service::JobService;
use actix_web::{web, HttpResponse};
use log::{debug, error};

/// `GET /job/{job_id}`: the stored job, `404` when unknown.
pub(crate) async fn process(
    job_id: web::Path<String>,
    service: web::Data<JobService>,
) -> Result<HttpResponse, JobError> {
    debug!("Processing job get request");
    let job_id = parse_job_id(&job_id)?;
    let job = service.get(&job_id).map_err(|e| {
        error!("Service error while reading job {}: {}", job_id, e);
        e
    })?;
    Ok(HttpResponse::Ok().json(job))
}
