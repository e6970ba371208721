use axum::{extract::State, response::Json};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::server::ClinicServer;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the database probe fails
    pub status: String,
    pub timestamp: String,
    pub version: String,
    /// Seconds since the server state was built
    pub uptime: u64,
    pub checks: BTreeMap<String, String>,
}

/// Version information response
#[derive(Debug, Serialize, ToSchema)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
    pub features: Vec<String>,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(server): State<ClinicServer>) -> Json<HealthResponse> {
    let mut checks = BTreeMap::new();

    let database = match server.database_healthy().await {
        Some(true) => "healthy",
        Some(false) => "unreachable",
        None => "in-memory",
    };
    checks.insert("database".to_string(), database.to_string());

    let status = if database == "unreachable" { "degraded" } else { "healthy" };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime_seconds(),
        checks,
    })
}

/// Version information handler
#[utoipa::path(
    get,
    path = "/version",
    responses(
        (status = 200, description = "Build information", body = VersionResponse)
    ),
    tag = "health"
)]
pub async fn version_info() -> Json<VersionResponse> {
    let mut features = vec!["http".to_string()];
    if cfg!(feature = "grpc") {
        features.push("grpc".to_string());
    }

    Json(VersionResponse {
        name: "Clinic Engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features,
    })
}
