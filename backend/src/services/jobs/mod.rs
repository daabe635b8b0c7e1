//! REST surface of the job queue.
//!
//! Handlers translate requests into `JobService` calls and let `JobError`
//! turn failures into responses:
//!
//! - `POST /job`: create a job, `201` with the stored job.
//! - `GET /job`: list all jobs.
//! - `GET /job/{job_id}`: fetch one job.
//! - `DELETE /job/{job_id}`: remove a job unless it is running, `204`.
//! - `PUT /job/{job_id}`: full update of a job still in `Created`.
//! - `PATCH /job/{job_id}`: partial update of a job still in `Created`.
//!
//! Path ids must be ULIDs; anything else is rejected before the store is asked.

mod create;
mod delete;
mod get;
mod list;
mod update;

use crate::job_controller::error::JobError;
use actix_web::web::{delete, get, patch, post, put, scope};
use actix_web::Scope;
use ulid::Ulid;

const API_PATH: &str = "/job";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(list::process))
        .route("/{job_id}", get().to(get::process))
        .route("/{job_id}", delete().to(delete::process))
        .route("/{job_id}", put().to(update::process_full))
        .route("/{job_id}", patch().to(update::process_partial))
}

fn parse_job_id(raw: &str) -> Result<String, JobError> {
    raw.trim()
        .parse::<Ulid>()
        .map(|id| id.to_string())
        .map_err(|_| JobError::bad_request("job id should be a ulid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job_controller::service::JobService;
    use crate::job_controller::store::JobStore;
    use crate::services::json_config;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use common::jobs::{JobStatus, JobType};
    use common::model::job::Job;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn service() -> JobService {
        JobService::new(Arc::new(JobStore::new()))
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($service.clone()))
                    .app_data(json_config())
                    .service(configure_routes()),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_then_get() {
        let svc = service();
        let app = app!(svc);

        let req = test::TestRequest::post()
            .uri("/job")
            .set_json(json!({"type": "Create", "src_url": "http://x/f.bin", "name": "first"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Job = test::read_body_json(resp).await;
        assert_eq!(created.status, JobStatus::Created);
        assert_eq!(created.job_type, JobType::Create);
        assert_eq!(created.name, "first");

        let req = test::TestRequest::get()
            .uri(&format!("/job/{}", created.id))
            .to_request();
        let fetched: Job = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn create_with_invalid_type_is_bad_request() {
        let svc = service();
        let app = app!(svc);

        let req = test::TestRequest::post()
            .uri("/job")
            .set_json(json!({"type": "invalid_Type", "src_url": "http://x/f.bin"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid job type");
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "bad_request");
    }

    #[actix_web::test]
    async fn malformed_json_is_bad_request() {
        let svc = service();
        let app = app!(svc);

        let req = test::TestRequest::post()
            .uri("/job")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid json body");
    }

    #[actix_web::test]
    async fn malformed_id_is_bad_request() {
        let svc = service();
        let app = app!(svc);

        let req = test::TestRequest::get().uri("/job/not-a-ulid").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "job id should be a ulid");
    }

    #[actix_web::test]
    async fn unknown_job_is_not_found() {
        let svc = service();
        let app = app!(svc);

        let req = test::TestRequest::get()
            .uri(&format!("/job/{}", Ulid::new()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn patch_and_put() {
        let svc = service();
        let app = app!(svc);
        let job = svc
            .create(common::requests::JobRequest {
                name: "keep me".to_string(),
                src_url: "http://x/f.bin".to_string(),
                job_type: "Create".to_string(),
                ..Default::default()
            })
            .unwrap();

        let req = test::TestRequest::patch()
            .uri(&format!("/job/{}", job.id))
            .set_json(json!({"src_url": "http://x/g.bin"}))
            .to_request();
        let patched: Job = test::call_and_read_body_json(&app, req).await;
        assert_eq!(patched.name, "keep me");
        assert_eq!(patched.src_url, "http://x/g.bin");

        let req = test::TestRequest::put()
            .uri(&format!("/job/{}", job.id))
            .set_json(json!({"type": "CreateAndRename", "src_url": "http://x/g.bin"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn update_after_processing_is_conflict() {
        let svc = service();
        let app = app!(svc);
        let job = svc
            .create(common::requests::JobRequest {
                src_url: "http://x/f.bin".to_string(),
                job_type: "Create".to_string(),
                ..Default::default()
            })
            .unwrap();
        svc.change_status(&job.id, "Finished").unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/job/{}", job.id))
            .set_json(json!({"type": "Create", "src_url": "http://x/g.bin"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "Cannot modify job in status other than created"
        );
    }

    #[actix_web::test]
    async fn delete_and_list() {
        let svc = service();
        let app = app!(svc);

        let req = test::TestRequest::get().uri("/job").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let job = svc
            .create(common::requests::JobRequest {
                src_url: "http://x/f.bin".to_string(),
                job_type: "Create".to_string(),
                ..Default::default()
            })
            .unwrap();

        let req = test::TestRequest::get().uri("/job").to_request();
        let all: Vec<Job> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.len(), 1);

        svc.change_status(&job.id, "Running").unwrap();
        let req = test::TestRequest::delete()
            .uri(&format!("/job/{}", job.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        svc.change_status(&job.id, "Created").unwrap();
        let req = test::TestRequest::delete()
            .uri(&format!("/job/{}", job.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(svc.get(&job.id).is_err());
    }
}
