//! User business rules: filtering, identifier assignment and updates.

use std::collections::BTreeMap;

use entities::{NewUser, User, UserChanges, UserFilter, UserPatch, Users};
use user_store::UserRepository;

use crate::error::{ServerError, ServerResult};

/// Format used when the service stamps a creation date.
const CREATED_ON_FORMAT: &str = "%d/%m/%Y";

/// User operations on top of a [`UserRepository`].
///
/// The service holds no state between calls; every operation works on the
/// collection as currently persisted.
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a new service.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns every user.
    pub async fn get_all(&self) -> ServerResult<Users> {
        Ok(self.repository.get_all().await?)
    }

    /// Returns the users matching every recognized query parameter.
    ///
    /// With no recognized parameter every user is returned.
    pub async fn filter(&self, params: &BTreeMap<String, String>) -> ServerResult<Users> {
        let filter = parse_filter(params)?;
        tracing::debug!(?filter, "Filtering users");

        let users = self.repository.get_all().await?;
        if filter.is_empty() {
            return Ok(users);
        }

        Ok(Users::new(
            users
                .users
                .into_iter()
                .filter(|user| filter.matches(user))
                .collect(),
        ))
    }

    /// Looks up a user by identifier.
    pub async fn get_by_id(&self, id: i64) -> ServerResult<Option<User>> {
        let users = self.repository.get_all().await?;
        Ok(users.find(id).cloned())
    }

    /// Creates a user with the next free identifier.
    pub async fn create(&self, new_user: NewUser) -> ServerResult<User> {
        let created_on = new_user
            .created_on
            .clone()
            .filter(|date| !date.is_empty())
            .unwrap_or_else(|| chrono::Local::now().format(CREATED_ON_FORMAT).to_string());

        Ok(self.repository.create(new_user, created_on).await?)
    }

    /// Replaces all mutable fields of a user.
    pub async fn full_update(&self, id: i64, changes: UserChanges) -> ServerResult<User> {
        Ok(self.repository.full_update(id, changes).await?)
    }

    /// Deletes a user.
    pub async fn delete_by_id(&self, id: i64) -> ServerResult<()> {
        Ok(self.repository.delete_by_id(id).await?)
    }

    /// Sets a user's last name.
    pub async fn update_last_name(&self, id: i64, last_name: String) -> ServerResult<User> {
        Ok(self.repository.update_last_name(id, last_name).await?)
    }

    /// Sets a user's age.
    pub async fn update_age(&self, id: i64, age: i64) -> ServerResult<User> {
        Ok(self.repository.update_age(id, age).await?)
    }

    /// Applies the fields present in `patch` in one repository write.
    pub async fn partial_update(&self, id: i64, patch: UserPatch) -> ServerResult<User> {
        if patch.is_empty() {
            return Err(ServerError::invalid("no fields to update were provided"));
        }

        Ok(self.repository.partial_update(id, patch).await?)
    }
}

/// Builds a [`UserFilter`] from query parameters.
///
/// Every supplied parameter must be non-empty. `id` and `edad` must be
/// positive integers, `altura` a positive number and `activo` a boolean.
/// Unrecognized parameters are otherwise ignored.
pub fn parse_filter(params: &BTreeMap<String, String>) -> ServerResult<UserFilter> {
    let mut filter = UserFilter::default();

    for (key, value) in params {
        if value.is_empty() {
            return Err(ServerError::invalid(format!(
                "value of parameter {key} cannot be empty"
            )));
        }

        match key.as_str() {
            "id" => filter.id = Some(parse_positive_int(key, value)?),
            "nombre" => filter.name = Some(value.clone()),
            "apellido" => filter.last_name = Some(value.clone()),
            "email" => filter.email = Some(value.clone()),
            "edad" => filter.age = Some(parse_positive_int(key, value)?),
            "altura" => {
                let height = value
                    .parse::<f64>()
                    .ok()
                    .filter(|h| *h > 0.0)
                    .ok_or_else(|| {
                        ServerError::invalid(format!(
                            "{key} must be a number greater than zero (received: {value})"
                        ))
                    })?;
                filter.height = Some(height);
            }
            "activo" => {
                let active = parse_bool(value).ok_or_else(|| {
                    ServerError::invalid(format!("{key} must be a boolean (received: {value})"))
                })?;
                filter.active = Some(active);
            }
            "fecha_de_creacion" => filter.created_on = Some(value.clone()),
            _ => {}
        }
    }

    Ok(filter)
}

fn parse_positive_int(key: &str, value: &str) -> ServerResult<i64> {
    value
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            ServerError::invalid(format!(
                "{key} must be an integer greater than zero (received: {value})"
            ))
        })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;
    use user_store::{DocumentStore, DocumentUserRepository, JsonFileStore, MemoryDocumentStore};

    use super::*;

    type TestService = UserService<DocumentUserRepository<MemoryDocumentStore>>;

    fn user(id: i64, last_name: &str) -> User {
        User::new(id, format!("user{id} name"), last_name, format!("user{id}@email.com"))
            .with_age(30 + id)
            .with_height(1.50 + id as f64 / 100.0)
            .with_created_on("13/12/2021")
    }

    fn service(users: Vec<User>) -> TestService {
        let store = MemoryDocumentStore::with_document(&Users::new(users)).unwrap();
        UserService::new(DocumentUserRepository::new(store))
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn new_user(created_on: Option<&str>) -> NewUser {
        NewUser {
            name: "Ana".to_string(),
            last_name: "Smith".to_string(),
            email: "ana@example.com".to_string(),
            age: 35,
            height: 1.58,
            created_on: created_on.map(str::to_string),
        }
    }

    async fn persisted(service: &TestService) -> Users {
        service.repository().document_store().read().await.unwrap()
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let service = service(vec![user(1, "Smith"), user(2, "Perez")]);

        assert_eq!(service.get_by_id(2).await.unwrap(), Some(user(2, "Perez")));
        assert_eq!(service.get_by_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_filter_by_last_name_is_exact() {
        let service = service(vec![
            user(1, "Smith"),
            user(2, "smith"),
            user(3, "Smithson"),
            user(4, "Smith"),
        ]);

        let users = service.filter(&params(&[("apellido", "Smith")])).await.unwrap();
        let ids: Vec<i64> = users.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[tokio::test]
    async fn test_filter_combines_attributes() {
        let service = service(vec![user(1, "Smith"), user(2, "Smith")]);

        let users = service
            .filter(&params(&[("apellido", "Smith"), ("edad", "32")]))
            .await
            .unwrap();
        assert_eq!(users.users, vec![user(2, "Smith")]);
    }

    #[tokio::test]
    async fn test_filter_without_attributes_returns_everything() {
        let service = service(vec![user(1, "Smith"), user(2, "Perez")]);

        let users = service.filter(&BTreeMap::new()).await.unwrap();
        assert_eq!(users.len(), 2);

        let users = service.filter(&params(&[("page", "2")])).await.unwrap();
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_filter_rejects_invalid_values() {
        let service = service(vec![user(1, "Smith")]);

        for pairs in [
            [("edad", "abc")],
            [("edad", "0")],
            [("id", "-1")],
            [("altura", "tall")],
            [("activo", "yes")],
            [("nombre", "")],
        ] {
            let err = service.filter(&params(&pairs)).await.unwrap_err();
            assert!(matches!(err, ServerError::InvalidRequest(_)), "{pairs:?}");
        }
    }

    #[test]
    fn test_parse_filter_builds_filter() {
        let filter = parse_filter(&params(&[
            ("id", "3"),
            ("altura", "1.75"),
            ("activo", "true"),
            ("fecha_de_creacion", "13/12/2021"),
        ]))
        .unwrap();

        assert_eq!(filter.id, Some(3));
        assert_eq!(filter.height, Some(1.75));
        assert_eq!(filter.active, Some(true));
        assert_eq!(filter.created_on.as_deref(), Some("13/12/2021"));
        assert!(filter.name.is_none());
    }

    #[tokio::test]
    async fn test_create_on_empty_collection_starts_at_one() {
        let service = service(vec![]);

        let created = service.create(new_user(Some("01/01/2022"))).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(created.active);
        assert_eq!(created.created_on, "01/01/2022");
        assert_eq!(persisted(&service).await.users, vec![created]);
    }

    #[tokio::test]
    async fn test_create_uses_maximum_identifier() {
        let service = service(vec![user(1, "A"), user(5, "B"), user(3, "C")]);

        let created = service.create(new_user(Some("01/01/2022"))).await.unwrap();
        assert_eq!(created.id, 6);

        let ids: Vec<i64> = persisted(&service).await.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 5, 3, 6]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_creates_get_distinct_identifiers() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("users.json"));
        let service = Arc::new(UserService::new(DocumentUserRepository::new(store)));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.create(new_user(Some("01/01/2022"))).await })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }

        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());

        let users: Users = service.repository().document_store().read().await.unwrap();
        let mut persisted: Vec<i64> = users.users.iter().map(|u| u.id).collect();
        persisted.sort_unstable();
        assert_eq!(persisted, ids);
    }

    #[tokio::test]
    async fn test_create_stamps_missing_date() {
        let service = service(vec![]);

        let created = service.create(new_user(None)).await.unwrap();
        let expected = chrono::Local::now().format(CREATED_ON_FORMAT).to_string();
        assert_eq!(created.created_on.len(), expected.len());
        assert_eq!(created.created_on.matches('/').count(), 2);
    }

    #[tokio::test]
    async fn test_full_update_missing_is_not_found() {
        let service = service(vec![user(1, "Smith")]);
        let changes = UserChanges {
            name: "n".to_string(),
            last_name: "l".to_string(),
            email: "e".to_string(),
            age: 1,
            height: 1.0,
        };

        let err = service.full_update(2, changes).await.unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));
        assert_eq!(persisted(&service).await.users, vec![user(1, "Smith")]);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let service = service(vec![user(1, "Smith")]);

        let err = service.delete_by_id(2).await.unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));

        service.delete_by_id(1).await.unwrap();
        assert!(persisted(&service).await.is_empty());
    }

    #[tokio::test]
    async fn test_partial_update_applies_present_fields() {
        let service = service(vec![user(1, "Smith")]);

        let updated = service
            .partial_update(
                1,
                UserPatch {
                    last_name: Some("Jones".to_string()),
                    age: Some(0),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.last_name, "Jones");
        assert_eq!(updated.age, 0);

        let updated = service
            .partial_update(
                1,
                UserPatch {
                    last_name: None,
                    age: Some(44),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.last_name, "Jones");
        assert_eq!(updated.age, 44);
    }

    #[tokio::test]
    async fn test_partial_update_with_both_fields_is_one_write() {
        let service = service(vec![user(1, "Smith"), user(2, "Perez")]);

        let updated = service
            .partial_update(
                1,
                UserPatch {
                    last_name: Some("Jones".to_string()),
                    age: Some(40),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.last_name, "Jones");
        assert_eq!(updated.age, 40);
        assert_eq!(persisted(&service).await.find(1), Some(&updated));

        let err = service
            .partial_update(
                9,
                UserPatch {
                    last_name: Some("Jones".to_string()),
                    age: Some(40),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));
        assert_eq!(persisted(&service).await.find(2), Some(&user(2, "Perez")));
    }

    #[tokio::test]
    async fn test_single_field_updates() {
        let service = service(vec![user(1, "Smith")]);

        let updated = service.update_last_name(1, "Jones".to_string()).await.unwrap();
        assert_eq!(updated.last_name, "Jones");

        let updated = service.update_age(1, 50).await.unwrap();
        assert_eq!(updated.last_name, "Jones");
        assert_eq!(updated.age, 50);

        let err = service.update_age(3, 50).await.unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_partial_update_rejects_empty_patch() {
        let service = service(vec![user(1, "Smith")]);

        let err = service
            .partial_update(1, UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));
    }
}
