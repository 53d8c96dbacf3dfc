#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the Saarthi emergency reporting service.
//!
//! Serves the REST API for submitting and tracking emergency reports.
//! Reports and the reverse-geocode cache are persisted in a single
//! `SQLite` database (default `data/saarthi.db`). Reverse geocoding goes
//! through the shared [`AddressResolver`], which consults the cache, then
//! the `OpenCage` provider, then the built-in Delhi gazetteer.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use saarthi_geocoder::opencage::{DEFAULT_BASE_URL, OpenCageClient};
use saarthi_geocoder::resolver::AddressResolver;
use saarthi_store::RecordStore;
use saarthi_store::geocode_cache::SqliteGeocodeCache;
use saarthi_store::sqlite::SqliteStore;
use std::path::Path;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    /// Persistent report store.
    pub store: Arc<dyn RecordStore>,
    /// Address resolver backed by the geocode cache and provider.
    pub resolver: Arc<AddressResolver>,
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/reports", web::post().to(handlers::submit_report))
            .route("/reports", web::get().to(handlers::list_reports))
            .route("/reports/{id}", web::get().to(handlers::get_report))
            .route(
                "/reports/{id}/status",
                web::post().to(handlers::update_status),
            )
            .route("/alerts", web::get().to(handlers::alerts))
            .route("/summary", web::get().to(handlers::summary))
            .route("/geocode/reverse", web::post().to(handlers::reverse_geocode)),
    );
}

/// Starts the emergency reporting API server.
///
/// Opens the report store and geocode cache, builds the address resolver,
/// and starts the Actix-Web HTTP server. This is a regular async function —
/// the caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// Configuration comes from the environment: `SAARTHI_DB_PATH`,
/// `GEOCODER_BASE_URL`, `GEOCODER_API_KEY`, `BIND_ADDR`, and `PORT`, each
/// with a default.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the `SQLite` database cannot be opened.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let db_path =
        std::env::var("SAARTHI_DB_PATH").unwrap_or_else(|_| "data/saarthi.db".to_string());

    log::info!("Opening report store at {db_path}...");
    let store = SqliteStore::open(Path::new(&db_path)).expect("Failed to open report store");

    log::info!("Opening geocode cache...");
    let cache =
        SqliteGeocodeCache::open(Path::new(&db_path)).expect("Failed to open geocode cache");

    let base_url =
        std::env::var("GEOCODER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let api_key = std::env::var("GEOCODER_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        log::warn!("GEOCODER_API_KEY is not set; reverse geocoding falls back to the gazetteer");
    }
    let provider = OpenCageClient::new(reqwest::Client::new(), base_url, api_key);
    let resolver = AddressResolver::new(Arc::new(cache), Arc::new(provider));

    let state = web::Data::new(AppState {
        store: Arc::new(store),
        resolver: Arc::new(resolver),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
