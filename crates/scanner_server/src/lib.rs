//! HTTP proxy in front of the upstream catalog: JSON endpoints for the browser
//! front end plus static file serving.
mod errors;
mod handlers;
mod requests;

use std::path::Path;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use chrono::NaiveDate;
use scanner_core::local_today;
use scanner_engine::{GraphqlTransport, NewTitlesScanner, Pacing, ScannerConfig, SearchClient};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use errors::{AppError, AppResult};
pub use requests::{NewTitlesRequest, TitlesRequest};

pub const SCAN_STATUS_HEADER: &str = "x-scan-status";

#[derive(Clone)]
pub struct AppState {
    pub scanner: NewTitlesScanner,
    pub search: SearchClient,
    pub country: String,
    pub language: String,
    /// Anchors the default new-titles window.
    pub today: fn() -> NaiveDate,
}

impl AppState {
    /// Every scan served by this state shares `pacing`.
    pub fn new(
        transport: Arc<dyn GraphqlTransport>,
        pacing: Pacing,
        config: &ScannerConfig,
    ) -> Self {
        Self {
            scanner: NewTitlesScanner::new(transport.clone())
                .with_pacing(pacing)
                .with_page_size(config.page_size),
            search: SearchClient::new(transport),
            country: config.country.clone(),
            language: config.language.clone(),
            today: local_today,
        }
    }

    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

pub fn create_app(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/providers", get(handlers::providers))
        .route("/api/genres", get(handlers::genres))
        .route("/api/search", get(handlers::search))
        .route("/api/titles", post(handlers::titles))
        .route("/api/titles/{id}/offers", get(handlers::title_offers))
        .route("/api/new-titles", post(handlers::new_titles))
        .route("/api/test", get(handlers::connection_test))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };
    app.layer(CorsLayer::permissive())
}
