//! User account endpoints

use axum::Router;
use domain_users::{UserService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = UserService::with_shared(state.users.clone(), state.jwt.clone());
    handlers::router(service, state.jwt.clone())
}

/// Create the indexes the users collection relies on.
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    state
        .users
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;
    tracing::info!("User collection indexes created");
    Ok(())
}
