//! Stateless JWT authentication.
//!
//! Tokens carry only the user id and expiry. Protected routes are wrapped in
//! [`jwt_auth_middleware`], which rejects requests through the envelope error
//! path and otherwise exposes the verified [`JwtClaims`] to handlers via the
//! [`AuthClaims`] extractor.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/profile", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, TokenError};
pub use middleware::{AuthClaims, jwt_auth_middleware};
