//! Route configuration and setup.
//!
//! Health checks live in [health](health).

mod health;

use crate::api_doc::get_openapi_spec;
use crate::constants::{
    HEADER_UPLOAD_EXPIRES_AT, HEADER_UPLOAD_TOKEN, HEADER_UPLOAD_URL, OPENAPI_JSON_PATH,
};
use crate::handlers::{generate_qr, upload, user_images};
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use qrdrop_core::Config;
use qrdrop_infra::{get_request_id, request_id_middleware, security_headers_middleware};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let request_timeout_secs = config.request_timeout_secs().max(1);
    tracing::info!(request_timeout_secs, "Request timeout layer enabled");

    let app = handoff_routes(config)
        .merge(public_routes())
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout_secs)))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = get_request_id(request).unwrap_or_default();
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

fn handoff_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate-qr", get(generate_qr::generate_qr))
        .route(
            "/upload/{token}",
            get(upload::upload_form)
                .post(upload::upload_submit)
                .layer(DefaultBodyLimit::max(config.max_upload_size_bytes())),
        )
        .route("/user/images", get(user_images::list_user_images))
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            OPENAPI_JSON_PATH,
            get(|| async { Json(get_openapi_spec()) }),
        )
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let exposed = [
        HeaderName::from_static(HEADER_UPLOAD_TOKEN),
        HeaderName::from_static(HEADER_UPLOAD_URL),
        HeaderName::from_static(HEADER_UPLOAD_EXPIRES_AT),
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - session cookies will not be sent cross-site");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
            .expose_headers(exposed)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        // Credentials cannot be combined with wildcard headers.
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                HeaderName::from_static("x-request-id"),
            ])
            .allow_credentials(true)
            .expose_headers(exposed)
    };
    Ok(cors)
}
