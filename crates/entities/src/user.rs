//! User-related entity definitions.

use serde::{Deserialize, Serialize};

/// A registered user.
///
/// Field names on the wire and on disk keep the keys used by existing
/// `users.json` files (`nombre`, `apellido`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the service.
    pub id: i64,
    /// Given name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Family name.
    #[serde(rename = "apellido")]
    pub last_name: String,
    /// Email address. Not checked for uniqueness.
    pub email: String,
    /// Age in years.
    #[serde(rename = "edad")]
    pub age: i64,
    /// Height in meters.
    #[serde(rename = "altura")]
    pub height: f64,
    /// Whether the account is active.
    #[serde(rename = "activo")]
    pub active: bool,
    /// Free-form creation date, usually `dd/mm/yyyy`.
    #[serde(rename = "fecha_de_creacion")]
    pub created_on: String,
}

impl User {
    /// Creates a new active user with the given identifier.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            last_name: last_name.into(),
            email: email.into(),
            age: 0,
            height: 0.0,
            active: true,
            created_on: String::new(),
        }
    }

    /// Sets the age.
    pub fn with_age(mut self, age: i64) -> Self {
        self.age = age;
        self
    }

    /// Sets the height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Sets the creation date.
    pub fn with_created_on(mut self, created_on: impl Into<String>) -> Self {
        self.created_on = created_on.into();
        self
    }

    /// Overwrites every mutable field with the given changes.
    pub fn apply(&mut self, changes: UserChanges) {
        self.name = changes.name;
        self.last_name = changes.last_name;
        self.email = changes.email;
        self.age = changes.age;
        self.height = changes.height;
    }

    /// Overwrites the fields present in the patch.
    pub fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
    }
}

/// The persisted user collection, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Users {
    #[serde(default)]
    pub users: Vec<User>,
}

impl Users {
    /// Wraps a list of users.
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Returns the identifier the next created user should receive.
    ///
    /// This is the maximum identifier plus one, or 1 for an empty collection.
    pub fn next_id(&self) -> i64 {
        self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }

    /// Finds a user by identifier.
    pub fn find(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Finds a user by identifier for mutation.
    pub fn find_mut(&mut self, id: i64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Returns the position of the user with the given identifier.
    pub fn position(&self, id: i64) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// The fields replaced by a full update.
#[derive(Debug, Clone, PartialEq)]
pub struct UserChanges {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub age: i64,
    pub height: f64,
}

/// The caller-supplied fields of a user about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub age: i64,
    pub height: f64,
    /// Creation date; `None` lets the service stamp the current date.
    pub created_on: Option<String>,
}

impl NewUser {
    /// Turns the candidate into an active user with the given identifier.
    pub fn into_user(self, id: i64, created_on: String) -> User {
        User {
            id,
            name: self.name,
            last_name: self.last_name,
            email: self.email,
            age: self.age,
            height: self.height,
            active: true,
            created_on,
        }
    }
}

/// A partial update. Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub last_name: Option<String>,
    pub age: Option<i64>,
}

impl UserPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.last_name.is_none() && self.age.is_none()
    }
}
