//! Job listing.

use crate::job_controller::error::JobError;
use crate::job_controller::service::JobService;
use actix_web::{web, HttpResponse};
use log::{debug, error};

/// `GET /job`: every job in the store, oldest first. `404` when the store is
/// empty.
pub(crate) async fn process(service: web::Data<JobService>) -> Result<HttpResponse, JobError> {
    debug!("Processing job list request");
    let jobs = service.get_all().map_err(|e| {
        error!("Service error while listing jobs: {}", e);
        e
    })?;
    Ok(HttpResponse::Ok().json(jobs))
}
