//! Users Domain
//!
//! Account registration, login, profile maintenance and role management on
//! top of MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, JWT middleware, post_process
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business rules, password hashing, token issuing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB and in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User record, partial update set, request context
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{MongoUserRepository, UserService, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let repository = MongoUserRepository::new(&client.database("user_service"));
//! repository.init_indexes().await?;
//!
//! let jwt = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-chars")?);
//! let service = UserService::new(repository, jwt.clone());
//! let router = handlers::router(service, jwt);
//! # Ok(())
//! # }
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod password;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use dto::*;
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{Gender, RequestContext, Role, UPDATED_AT, UpdateSet, User, UserStatus};
pub use self::mongodb::{MongoUserRepository, USERS_COLLECTION};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{DELETE_CONFIRMATION_PREFIX, UserService, delete_confirmation};
