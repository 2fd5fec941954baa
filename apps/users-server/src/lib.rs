//! Users Server
//!
//! HTTP service exposing CRUD operations over users persisted in a single
//! JSON file. Handlers bind HTTP input, the user service applies business
//! rules and the repository round-trips the whole collection through the
//! file store.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use user_store::{DocumentUserRepository, JsonFileStore, UserRepository};

use crate::config::Config;
use crate::state::{AppState, create_shared_state};

/// Repository used by the server binary.
pub type FileRepository = DocumentUserRepository<JsonFileStore>;

/// Creates the application router with all routes configured.
pub fn create_app<R: UserRepository + 'static>(state: Arc<AppState<R>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state backed by the configured JSON file.
pub fn create_state(config: Config) -> Arc<AppState<FileRepository>> {
    let store = JsonFileStore::new(config.data_path.clone());
    create_state_with_repository(config, DocumentUserRepository::new(store))
}

/// Creates the application state with the given repository.
pub fn create_state_with_repository<R: UserRepository>(
    config: Config,
    repository: R,
) -> Arc<AppState<R>> {
    create_shared_state(config, repository)
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
