//! Liveness probe.

use axum::Json;
use serde::Serialize;

use crate::models::Envelope;

#[derive(Debug, Serialize)]
pub(crate) struct HealthStatus {
    status: &'static str,
}

/// Unauthenticated liveness probe; reports nothing about the store.
pub(crate) async fn health() -> Json<Envelope<HealthStatus>> {
    Json(Envelope::ok(HealthStatus { status: "ok" }))
}
