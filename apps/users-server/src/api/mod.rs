//! API endpoints.

pub mod response;
pub mod users;

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use user_store::UserRepository;

use crate::middleware::auth::token_middleware;
use crate::state::AppState;

/// Creates the API router with all endpoints.
///
/// Every `/users` route requires the access token; `/health` does not.
pub fn create_router<R: UserRepository + 'static>(state: Arc<AppState<R>>) -> Router {
    let users = Router::new()
        .route(
            "/users/",
            get(users::filter_users::<R>).post(users::create_user::<R>),
        )
        .route("/users/GetAll", get(users::get_all_users::<R>))
        .route(
            "/users/:id",
            get(users::get_user::<R>)
                .put(users::update_user::<R>)
                .delete(users::delete_user::<R>)
                .patch(users::patch_user::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            token_middleware::<R>,
        ));

    Router::new()
        .merge(users)
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
