use axum::http::StatusCode;

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness from a store ping result: 200 when reachable, 503 otherwise.
pub fn readiness<E: std::fmt::Display>(ping: Result<(), E>) -> StatusCode {
    match ping {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
