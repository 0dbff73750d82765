//! CareDesk Server - clinic patient-record dashboard
//!
//! Server-rendered HTML over axum. Doctors manage patients and their
//! prescriptions, telehealth appointments and lab orders; patients get a
//! read-only view of the record linked to their account. Sessions are stored
//! in the database and referenced by an HttpOnly cookie.

pub mod calendar;
pub mod config;
pub mod cookies;
pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod views;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::*;
pub use server::ClinicServer;

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: ClinicServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
