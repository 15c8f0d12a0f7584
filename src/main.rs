use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod auth;
mod clock;
mod config;
mod db;
mod docs;
mod engine;
mod error;
mod model;
mod models;
mod repository;
mod roster;
mod routes;
mod service;
mod utils;

use config::Config;
use db::init_db;

use crate::clock::SystemClock;
use crate::docs::ApiDoc;
use crate::repository::mysql::{MySqlAttendanceRepository, MySqlEmployeeRepository};
use crate::routes::Limiters;
use crate::service::AttendanceService;
use crate::utils::roster_cache::{RosterCache, warmup_roster_cache};
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance API is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await?;

    let employees = Arc::new(MySqlEmployeeRepository::new(pool.clone()));
    let roster_cache = RosterCache::new(config.roster_cache_ttl);
    let service = Data::new(AttendanceService::new(
        Arc::new(MySqlAttendanceRepository::new(pool)),
        employees.clone(),
        roster_cache.clone(),
        Arc::new(SystemClock),
        config.departments.clone(),
    ));

    actix_web::rt::spawn(async move {
        if let Err(e) = warmup_roster_cache(&roster_cache, employees.as_ref()).await {
            error!(error = ?e, "Failed to warmup roster cache");
        }
    });

    let limiters = Limiters::from_config(&config)?;
    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    HttpServer::new(move || {
        let config = config_data.clone();
        let limiters = limiters.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard so JS/CSS assets resolve
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .app_data(config.clone())
            .service(index)
            // Configure auth + protected routes with rate limiting
            .configure(move |cfg| routes::configure(cfg, &config, &limiters))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
