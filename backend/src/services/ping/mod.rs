use actix_web::web::{get, scope};
use actix_web::{HttpResponse, Responder, Scope};

/// Liveness probe. Never touches the job store.
pub fn configure_routes() -> Scope {
    scope("/ping").route("", get().to(process))
}

async fn process() -> impl Responder {
    HttpResponse::Ok().body("pong")
}
