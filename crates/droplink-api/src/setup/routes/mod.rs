//! Route configuration and setup.
//!
//! Pairing and file route groups live here; health checks in [health](health).

mod health;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api_doc;
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use droplink_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.request_body_limit_bytes();

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let app = pairing_routes(state.clone())
        .merge(file_routes(state.clone()))
        .merge(health::health_routes(state))
        .route("/api/openapi.json", get(openapi_spec))
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}

fn pairing_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            &format!("{}/codes", API_PREFIX),
            post(handlers::code_generate::generate_code),
        )
        .route(
            &format!("{}/codes/join", API_PREFIX),
            post(handlers::code_join::join_code),
        )
        .route(
            &format!("{}/devices", API_PREFIX),
            get(handlers::device_info::device_info),
        )
        .with_state(state)
}

fn file_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            &format!("{}/files", API_PREFIX),
            post(handlers::file_upload::upload_files),
        )
        .route(
            &format!("{}/files", API_PREFIX),
            get(handlers::file_list::list_files),
        )
        .with_state(state)
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(api_doc::openapi_spec())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };
    Ok(cors)
}
