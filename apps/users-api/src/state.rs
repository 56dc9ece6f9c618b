//! Application state management.
//!
//! [`AppState`] is the dependency-injection context of the binary. It is
//! built once in `main`, before the listener is bound, and handed to the
//! route constructors; nothing in it is mutated afterwards.

use axum_helpers::JwtAuth;
use domain_users::MongoUserRepository;
use mongodb::{Client, Database};
use std::sync::Arc;

/// Shared application state.
///
/// Cloning is cheap: the MongoDB client and the repository share one
/// connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
    pub jwt: JwtAuth,
    pub users: Arc<MongoUserRepository>,
}

impl AppState {
    /// Wire the collaborators together.
    pub fn new(config: crate::config::Config, mongo_client: Client) -> Self {
        let db = mongo_client.database(&config.mongodb.database);
        let jwt = JwtAuth::new(&config.jwt);
        let users = Arc::new(MongoUserRepository::new(&db));

        Self {
            config,
            mongo_client,
            db,
            jwt,
            users,
        }
    }
}
