//! # Axum Helpers
//!
//! Shared HTTP plumbing for the user services.
//!
//! ## Modules
//!
//! - **[`errors`]**: business error registry and the internal/business split
//! - **[`dispatch`]**: turns handler results into enveloped responses, logs every request
//! - **[`auth`]**: stateless JWT issuing, verification and route middleware
//! - **[`extractors`]**: validated JSON bodies
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{CorsConfig, create_production_app, create_router};
//! use core_config::{FromEnv, server::ServerConfig};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! let router = create_router::<ApiDoc>(api_routes, &CorsConfig::from_env()?);
//! create_production_app(router, &ServerConfig::from_env()?, async {}).await?;
//! ```

pub mod auth;
pub mod dispatch;
pub mod errors;
pub mod extractors;
pub mod server;

#[cfg(test)]
mod log_capture;

pub use auth::{
    ACCESS_TOKEN_TTL, AuthClaims, JwtAuth, JwtClaims, JwtConfig, TokenError, jwt_auth_middleware,
};
pub use dispatch::{post_process, reject};
pub use errors::{
    AppError, BusinessError, UNKNOWN_CODE, codes, end_with_cause, end_with_code, end_with_message,
};
pub use extractors::ValidatedJson;
pub use server::{
    CorsConfig, HealthCheckFuture, HealthResponse, ReadyResponse, ShutdownCoordinator,
    create_production_app, create_router, health_router, run_health_checks, shutdown_signal,
};
