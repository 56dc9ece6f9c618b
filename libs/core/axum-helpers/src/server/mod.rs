//! Server infrastructure: router assembly, health endpoints and graceful
//! shutdown.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{CorsConfig, create_production_app, create_router, health_router};
//! use core_config::{FromEnv, app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes, &CorsConfig::from_env()?)
//!     .merge(health_router(app_info!()));
//!
//! create_production_app(router, &ServerConfig::from_env()?, async {}).await?;
//! ```

pub mod app;
pub mod cors;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use cors::CorsConfig;
pub use health::{
    HealthCheckFuture, HealthResponse, ReadyResponse, health_router, run_health_checks,
};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
