//! Job removal endpoint. Running jobs are kept and answered with `409`.

use super::parse_job_id;
use crate::job_controller::error::JobError;
use crate::job_controller::service::JobService;
use actix_web::{web, HttpResponse};
use log::{debug, error};

/// `DELETE /job/{job_id}`: answers `204 No Content` once the job is gone.
pub(crate) async fn process(
    job_id: web::Path<String>,
    service: web::Data<JobService>,
) -> Result<HttpResponse, JobError> {
    debug!("Processing job delete request");
    let job_id = parse_job_id(&job_id)?;
    service.delete(&job_id).map_err(|e| {
        error!("Service error while deleting job {}: {}", job_id, e);
        e
    })?;
    Ok(HttpResponse::NoContent().finish())
}
