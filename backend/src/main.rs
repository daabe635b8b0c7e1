mod config;
mod job_controller;
mod providers;
mod services;

use crate::config::Config;
use crate::job_controller::cleanup::{JobCleanup, Retention};
use crate::job_controller::processor::JobProcessor;
use crate::job_controller::service::JobService;
use crate::job_controller::shutdown::Shutdown;
use crate::job_controller::store::JobStore;
use crate::providers::LocalFileProvider;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    info!("Configuration loaded: {:?}", config);

    // Single store for the whole process; everything else reaches it through the service.
    let service = JobService::new(Arc::new(JobStore::new()));
    let shutdown = Shutdown::new();

    let http_service = service.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(services::json_config())
            .app_data(web::Data::new(http_service.clone()))
            .service(services::jobs::configure_routes())
            .service(services::ping::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    info!("Starting job processor");
    let processor = JobProcessor::new(
        service.clone(),
        Arc::new(LocalFileProvider::new()),
        config.no_job_wait,
        shutdown.clone(),
    );
    let processor_handle = tokio::spawn(processor.run());

    info!("Starting job cleanup");
    let cleanup = JobCleanup::new(
        service,
        config.cleanup_wait,
        Retention {
            finished: config.delete_finished_age,
            failed: config.delete_failed_age,
        },
        shutdown.clone(),
    );
    let cleanup_handle = tokio::spawn(cleanup.run());

    info!("Server running at http://{}:{}", config.host, config.port);
    let result = server.await;

    info!("HTTP server stopped, waiting for background loops");
    shutdown.trigger();
    for (name, handle) in [("processor", processor_handle), ("cleanup", cleanup_handle)] {
        if let Err(e) = handle.await {
            error!("Job {} ended abnormally: {}", name, e);
        }
    }
    info!("Application ended");
    result
}
