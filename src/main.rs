use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::{Context, bail};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod docs;
mod error;
mod model;
mod models;
mod remote;
mod repository;
mod routes;
mod service;
mod state;
mod storage;
#[cfg(test)]
mod testing;
mod utils;

use config::{Config, StorageBackend};
use model::fixture::Fixture;
use state::AppServices;
use storage::{KeyValueStore, MemoryStore, MySqlStore};

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Fichaje time clock"
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage, records are lost on restart");
            Ok(Arc::new(MemoryStore::default()))
        }
        StorageBackend::MySql => {
            let Some(url) = config.database_url.as_deref() else {
                bail!("DATABASE_URL must be set when STORAGE_BACKEND=mysql");
            };
            let store = MySqlStore::connect(url)
                .await
                .context("Failed to connect to database")?;
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let fixture = Fixture::from_config(config.fixture_path.as_deref())?;
    info!(
        users = fixture.users.len(),
        records = fixture.fichajes.len(),
        "Fixture loaded"
    );

    let store = open_store(&config).await?;
    let services = AppServices::new(&config, fixture, store);

    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    HttpServer::new(move || {
        let config = config_data.clone();
        let services = services.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(config.clone())
            .configure(|cfg| services.register(cfg))
            .service(index)
            // Public + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
