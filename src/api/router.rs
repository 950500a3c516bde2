use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::customers;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::openapi::create_docs_router;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
///
/// The Prometheus endpoint is merged in only when metrics were initialized.
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Customer API
        .nest("/api/customers", customers::create_customers_router())
        .with_state(state)
        .merge(create_docs_router())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router
}
