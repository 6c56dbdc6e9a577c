//! shop-server library crate
//!
//! Exposes `build_app`, `config` and `db` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod config;
pub mod db;
mod error;
mod middleware;
mod routes;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use shop_core::ResourceKind;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::StoreHandle;
use middleware::ApiKeyAuth;

pub use middleware::auth::API_KEY_HEADER;

/// Build the full application router with all routes and middleware.
///
/// The store handle may still be pending; `/api` traffic is answered with
/// 503 until it is filled. Extracted from `main()` so integration tests can
/// construct the app without binding to a TCP port.
pub fn build_app(store: StoreHandle, config: &Config) -> Router {
    // Create auth state
    let auth = ApiKeyAuth::new(config.api_key.clone());
    tracing::debug!(enabled = auth.is_enabled(), "API key gate configured");

    // Create rate limiter
    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    // Resource routes (mutations require auth when a key is configured)
    let resource_routes = ResourceKind::ALL
        .into_iter()
        .fold(Router::<StoreHandle>::new(), |router, kind| {
            router.merge(routes::resource_routes(kind))
        })
        .route_layer(axum_mw::from_fn(middleware::auth_middleware))
        .layer(Extension(auth));

    let api_routes = Router::new()
        .route("/api/health", get(routes::health::check))
        .merge(resource_routes)
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    // Install Prometheus metrics recorder.
    // Use build_recorder() + set_global_recorder() so that repeated calls
    // (e.g. in integration tests) don't panic. The second install is
    // silently ignored and we still get a valid handle for /metrics.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    // Public routes (never gated)
    let public_routes = Router::new()
        .route("/", get(routes::landing::index))
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    // Build CORS layer
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Build application. Layers run outermost-last: logging, then body
    // parsing, then the readiness gate, then per-route auth.
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .fallback(routes::fallback)
        .with_state(store.clone())
        .layer(axum_mw::from_fn_with_state(
            store,
            middleware::readiness_middleware,
        ))
        .layer(axum_mw::from_fn(middleware::json_body_middleware))
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_log_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
