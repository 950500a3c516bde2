//! Health check endpoints for orchestrators and load balancers

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use super::state::AppState;
use crate::api::types::Json;
use crate::domain::DomainError;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
/// Used for basic liveness checks
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check with dependency verification
/// Fails when the customer store cannot be reached
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let store_check = check_component("customer_store", state.store.ping()).await;
    let cache_check = check_component("customer_cache", async {
        state.cache.size().await.map(|_| ())
    })
    .await;

    // Without the store nothing works; a broken cache only degrades
    let overall_status = if store_check.status != HealthStatus::Healthy {
        HealthStatus::Unhealthy
    } else if cache_check.status != HealthStatus::Healthy {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![store_check, cache_check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK, // Still accept requests
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
/// Used by Kubernetes liveness checks to detect crashes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Run one dependency check; failure details go to the log, not the response
async fn check_component(
    name: &str,
    check: impl Future<Output = Result<(), DomainError>>,
) -> HealthCheck {
    let start = Instant::now();
    let result = check.await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    match result {
        Ok(()) => HealthCheck {
            name: name.to_string(),
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(e) => {
            warn!(
                check = name,
                component = e.component(),
                error = %e,
                "Readiness check failed"
            );

            HealthCheck {
                name: name.to_string(),
                status: HealthStatus::Unhealthy,
                message: Some(format!("{} unavailable", name)),
                latency_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::cache::MockCache;
    use crate::domain::customer::MockCustomerStore;
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::customer::{CachedCustomerRepository, InMemoryCustomerStore};

    fn state_with(
        store: Arc<dyn crate::domain::CustomerStore>,
        cache: Arc<dyn crate::domain::Cache>,
    ) -> AppState {
        let repository = Arc::new(CachedCustomerRepository::new(store.clone(), cache.clone()));
        AppState::new(repository, store, cache)
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(!json.contains("checks"));
    }

    #[tokio::test]
    async fn test_ready_when_dependencies_respond() {
        let state = state_with(
            Arc::new(InMemoryCustomerStore::new()),
            Arc::new(InMemoryCache::new()),
        );

        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_when_store_is_down() {
        let mut store = MockCustomerStore::new();
        store
            .expect_ping()
            .returning(|| Err(DomainError::storage("connection refused")));

        let state = state_with(Arc::new(store), Arc::new(InMemoryCache::new()));

        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_degraded_cache_still_ready() {
        let state = state_with(
            Arc::new(InMemoryCustomerStore::new()),
            Arc::new(MockCache::new().with_error("cache offline")),
        );

        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_check_component_hides_failure_detail() {
        let check = check_component("customer_store", async {
            Err(DomainError::storage("password authentication failed for user sa"))
        })
        .await;

        assert!(check.status == HealthStatus::Unhealthy);
        assert_eq!(check.message.as_deref(), Some("customer_store unavailable"));
    }

    #[tokio::test]
    async fn test_ready_body_does_not_leak_store_error() {
        let mut store = MockCustomerStore::new();
        store
            .expect_ping()
            .returning(|| Err(DomainError::storage("host=db.internal port=5432 refused")));

        let state = state_with(Arc::new(store), Arc::new(InMemoryCache::new()));

        let response = ready_check(State(state)).await.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(body.contains("customer_store unavailable"));
        assert!(!body.contains("db.internal"));
    }
}
