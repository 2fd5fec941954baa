//! User repository over a document store.

use async_trait::async_trait;
use entities::{NewUser, User, UserChanges, UserPatch, Users};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{DocumentStore, UserStoreError, UserStoreResult};

/// Trait for user persistence operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the whole collection in insertion order.
    async fn get_all(&self) -> UserStoreResult<Users>;

    /// Appends a user. The caller chooses the identifier.
    async fn store(&self, user: User) -> UserStoreResult<User>;

    /// Appends a new active user with the next free identifier. The
    /// identifier is chosen in the same cycle that writes the user.
    async fn create(&self, new_user: NewUser, created_on: String) -> UserStoreResult<User>;

    /// Replaces the mutable fields of the user with the given identifier.
    async fn full_update(&self, id: i64, changes: UserChanges) -> UserStoreResult<User>;

    /// Removes the user with the given identifier, keeping the order of the
    /// remaining users.
    async fn delete_by_id(&self, id: i64) -> UserStoreResult<()>;

    /// Sets the last name of the user with the given identifier.
    async fn update_last_name(&self, id: i64, last_name: String) -> UserStoreResult<User>;

    /// Sets the age of the user with the given identifier.
    async fn update_age(&self, id: i64, age: i64) -> UserStoreResult<User>;

    /// Applies every field present in `patch` in a single write.
    async fn partial_update(&self, id: i64, patch: UserPatch) -> UserStoreResult<User>;
}

/// [`UserRepository`] that keeps the collection as one document in a
/// [`DocumentStore`].
///
/// Each call performs a full read, mutates the collection in memory and
/// writes it back. A single async mutex serializes these cycles so that
/// concurrent requests in this process cannot lose each other's updates.
#[derive(Debug)]
pub struct DocumentUserRepository<D: DocumentStore> {
    store: D,
    lock: Mutex<()>,
}

impl<D: DocumentStore> DocumentUserRepository<D> {
    /// Creates a repository over the given store.
    pub fn new(store: D) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Returns the underlying document store.
    pub fn document_store(&self) -> &D {
        &self.store
    }

    /// Runs a read-modify-write cycle. Nothing is written when `op` fails.
    async fn modify<T, F>(&self, op: F) -> UserStoreResult<T>
    where
        F: FnOnce(&mut Users) -> UserStoreResult<T> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut users: Users = self.store.read().await?;
        let result = op(&mut users)?;
        self.store.write(&users).await?;
        Ok(result)
    }

    async fn modify_user<F>(&self, id: i64, op: F) -> UserStoreResult<User>
    where
        F: FnOnce(&mut User) + Send,
    {
        self.modify(|users| {
            let user = users
                .find_mut(id)
                .ok_or_else(|| UserStoreError::not_found(id))?;
            op(user);
            Ok(user.clone())
        })
        .await
    }
}

#[async_trait]
impl<D: DocumentStore> UserRepository for DocumentUserRepository<D> {
    async fn get_all(&self) -> UserStoreResult<Users> {
        let _guard = self.lock.lock().await;
        self.store.read().await
    }

    async fn store(&self, user: User) -> UserStoreResult<User> {
        let user = self
            .modify(move |users| {
                users.users.push(user.clone());
                Ok(user)
            })
            .await?;

        info!(user_id = user.id, "User stored");
        Ok(user)
    }

    async fn create(&self, new_user: NewUser, created_on: String) -> UserStoreResult<User> {
        let user = self
            .modify(move |users| {
                let user = new_user.into_user(users.next_id(), created_on);
                users.users.push(user.clone());
                Ok(user)
            })
            .await?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    async fn full_update(&self, id: i64, changes: UserChanges) -> UserStoreResult<User> {
        let user = self.modify_user(id, move |user| user.apply(changes)).await?;

        info!(user_id = id, "User updated");
        Ok(user)
    }

    async fn delete_by_id(&self, id: i64) -> UserStoreResult<()> {
        self.modify(|users| {
            let index = users
                .position(id)
                .ok_or_else(|| UserStoreError::not_found(id))?;
            users.users[index].active = false;
            users.users.remove(index);
            Ok(())
        })
        .await?;

        info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn update_last_name(&self, id: i64, last_name: String) -> UserStoreResult<User> {
        let user = self
            .modify_user(id, move |user| user.last_name = last_name)
            .await?;

        debug!(user_id = id, "User last name updated");
        Ok(user)
    }

    async fn update_age(&self, id: i64, age: i64) -> UserStoreResult<User> {
        let user = self.modify_user(id, move |user| user.age = age).await?;

        debug!(user_id = id, age, "User age updated");
        Ok(user)
    }

    async fn partial_update(&self, id: i64, patch: UserPatch) -> UserStoreResult<User> {
        let user = self
            .modify_user(id, move |user| user.apply_patch(patch))
            .await?;

        debug!(user_id = id, "User partially updated");
        Ok(user)
    }
}
