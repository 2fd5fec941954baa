//! Application state.

use std::sync::Arc;

use user_store::UserRepository;

use crate::config::Config;
use crate::services::user_service::UserService;

/// Shared application state.
pub struct AppState<R: UserRepository> {
    /// Server configuration.
    pub config: Config,
    /// User service.
    pub users: UserService<R>,
}

impl<R: UserRepository> AppState<R> {
    /// Creates new application state.
    pub fn new(config: Config, repository: R) -> Self {
        Self {
            config,
            users: UserService::new(repository),
        }
    }
}

/// Type alias for shared state.
pub type SharedState<R> = Arc<AppState<R>>;

/// Creates shared state from config and repository.
pub fn create_shared_state<R: UserRepository>(config: Config, repository: R) -> SharedState<R> {
    Arc::new(AppState::new(config, repository))
}
