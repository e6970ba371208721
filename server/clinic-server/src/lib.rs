//! Clinic Engine server
//!
//! HTTP (axum) and optional gRPC (tonic, feature `grpc`) front ends over the
//! patient, doctor, appointment and prescription services.

pub mod config;
pub mod error;
#[cfg(feature = "grpc")]
pub mod grpc;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::ClinicConfig;
pub use error::{ApiError, ApiResult};
pub use server::ClinicServer;

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: ClinicServer) -> Router {
    let cors = middleware::create_cors_layer(&server.config.server.cors_origins);

    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
