//! User API endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    async_trait,
    extract::{FromRequest, Path, Query, Request, State},
};
use entities::{NewUser, User, UserChanges, UserPatch, Users};
use serde::{Deserialize, de::DeserializeOwned};
use user_store::UserRepository;

use crate::api::response::Envelope;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// JSON body extractor that reports decode failures in the response envelope.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::invalid(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Body of create and full update requests.
///
/// `id` and `activo` may be sent but are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "edad")]
    pub age: i64,
    #[serde(rename = "altura")]
    pub height: f64,
    #[serde(rename = "fecha_de_creacion")]
    pub created_on: Option<String>,
}

impl UserRequest {
    fn validate(&self) -> ServerResult<()> {
        for (field, value) in [
            ("nombre", &self.name),
            ("apellido", &self.last_name),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(ServerError::invalid(format!("{field} is required")));
            }
        }
        if self.age == 0 {
            return Err(ServerError::invalid("edad is required"));
        }
        if self.height == 0.0 {
            return Err(ServerError::invalid("altura is required"));
        }
        Ok(())
    }

    fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name,
            last_name: self.last_name,
            email: self.email,
            age: self.age,
            height: self.height,
            created_on: self.created_on,
        }
    }

    fn into_changes(self) -> UserChanges {
        UserChanges {
            name: self.name,
            last_name: self.last_name,
            email: self.email,
            age: self.age,
            height: self.height,
        }
    }
}

/// Body of partial update requests. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct PartialUpdateRequest {
    #[serde(default, rename = "apellido")]
    pub last_name: Option<String>,
    #[serde(default, rename = "edad")]
    pub age: Option<i64>,
}

impl PartialUpdateRequest {
    fn into_patch(self) -> ServerResult<UserPatch> {
        if self.last_name.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(ServerError::invalid("apellido cannot be empty"));
        }
        Ok(UserPatch {
            last_name: self.last_name,
            age: self.age,
        })
    }
}

fn parse_id(raw: &str) -> ServerResult<i64> {
    raw.parse()
        .map_err(|_| ServerError::invalid(format!("invalid user id: {raw}")))
}

/// Lists users matching the query parameters.
pub async fn filter_users<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ServerResult<Envelope<Users>> {
    let users = state.users.filter(&params).await?;
    Ok(Envelope::success(users))
}

/// Lists every user.
pub async fn get_all_users<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> ServerResult<Envelope<Users>> {
    let users = state.users.get_all().await?;
    Ok(Envelope::success(users))
}

/// Gets a user by ID.
pub async fn get_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> ServerResult<Envelope<User>> {
    let id = parse_id(&id)?;

    let user = state
        .users
        .get_by_id(id)
        .await?
        .ok_or_else(|| ServerError::user_not_found(id))?;

    Ok(Envelope::success(user))
}

/// Creates a user.
pub async fn create_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    ApiJson(request): ApiJson<UserRequest>,
) -> ServerResult<Envelope<User>> {
    request.validate()?;

    let user = state.users.create(request.into_new_user()).await?;
    Ok(Envelope::success(user))
}

/// Replaces every mutable field of a user.
pub async fn update_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UserRequest>,
) -> ServerResult<Envelope<User>> {
    let id = parse_id(&id)?;
    request.validate()?;

    let user = state.users.full_update(id, request.into_changes()).await?;
    Ok(Envelope::success(user))
}

/// Deletes a user.
pub async fn delete_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> ServerResult<Envelope<&'static str>> {
    let id = parse_id(&id)?;

    state.users.delete_by_id(id).await?;
    Ok(Envelope::success("user deleted successfully"))
}

/// Updates the last name and/or age of a user.
pub async fn patch_user<R: UserRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PartialUpdateRequest>,
) -> ServerResult<Envelope<User>> {
    let id = parse_id(&id)?;

    let user = state.users.partial_update(id, request.into_patch()?).await?;
    Ok(Envelope::success(user))
}
