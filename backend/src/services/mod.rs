pub mod jobs;
pub mod ping;

use crate::job_controller::error::JobError;
use actix_web::web;
use log::debug;

/// Largest accepted JSON body.
const JSON_LIMIT: usize = 64 * 1024;

/// JSON extractor settings shared by every route. Bodies that fail to decode
/// are answered like any other bad request.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            debug!("Rejected request body: {}", err);
            JobError::bad_request("invalid json body").into()
        })
}
