//! # textrace-api — HTTP Service
//!
//! Axum service exposing the hash-chain ledger and the batch registry that
//! records into it.
//!
//! ## API Surface
//!
//! | Prefix                      | Module                 | Auth |
//! |-----------------------------|------------------------|------|
//! | `/health/*`                 | [`app`]                | no   |
//! | `/api/health`               | [`routes::health`]     | no   |
//! | `/api/blockchain/*`         | [`routes::ledger`]     | no   |
//! | `GET /api/batch/{id}`       | [`routes::batches`]    | no   |
//! | `/api/batch/stats/summary`  | [`routes::batches`]    | no   |
//! | other `/api/batch*`         | [`routes::batches`]    | yes  |
//! | `/openapi.json`             | [`openapi`]            | yes  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CORS → TraceLayer → MetricsMiddleware → AuthMiddleware (batch routes) → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod registry;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::auth::AuthConfig;
pub use crate::error::AppError;
pub use crate::state::{AppConfig, AppState};

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = state.metrics.clone();

    let protected = Router::new()
        .merge(routes::batches::router())
        .merge(openapi::router())
        .route_layer(from_fn(auth::auth_middleware));

    let public = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(routes::health::router())
        .merge(routes::ledger::router())
        .merge(routes::batches::public_router());

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(CorsLayer::permissive())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics))
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness() -> &'static str {
    "ready"
}
