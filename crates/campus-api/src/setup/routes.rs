//! Route configuration and setup

use crate::constants::{SUBMIT_ADMISSION_PATH, SUBMIT_CONTACT_PATH, UPLOAD_MEDIA_PATH};
use crate::error::{RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER, RETRY_AFTER_HEADER};
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use campus_core::Config;
use campus_infra::middleware::REQUEST_ID_HEADER;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the router with all middleware applied
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let app = gateway_routes()
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(config.max_request_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// The three gateway endpoints. Each answers `OPTIONS` with an empty 200 and
/// every other method with a JSON 405.
fn gateway_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            SUBMIT_CONTACT_PATH,
            post(handlers::contact::submit_contact)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            SUBMIT_ADMISSION_PATH,
            post(handlers::admission::submit_admission)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            UPLOAD_MEDIA_PATH,
            post(handlers::upload::upload_media)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let exposed = [
        RETRY_AFTER_HEADER,
        RATE_LIMIT_LIMIT_HEADER,
        RATE_LIMIT_REMAINING_HEADER,
        REQUEST_ID_HEADER,
    ]
    .iter()
    .map(|name| HeaderName::try_from(name.to_ascii_lowercase()))
    .collect::<Result<Vec<_>, _>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers(exposed);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        return Ok(cors.allow_origin(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(cors.allow_origin(origins))
}
