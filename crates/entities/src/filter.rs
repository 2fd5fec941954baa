//! Attribute filter over users.

use crate::User;

/// Exact-match filter over user attributes.
///
/// Every attribute that is `Some` must equal the user's value; unset
/// attributes are ignored. An empty filter matches every user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub height: Option<f64>,
    pub active: Option<bool>,
    pub created_on: Option<String>,
}

impl UserFilter {
    /// Returns true if no attribute is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns true if the user satisfies every set attribute.
    pub fn matches(&self, user: &User) -> bool {
        fn check<T: PartialEq + ?Sized>(expected: Option<&T>, actual: &T) -> bool {
            expected.is_none_or(|e| e == actual)
        }

        check(self.id.as_ref(), &user.id)
            && check(self.name.as_deref(), user.name.as_str())
            && check(self.last_name.as_deref(), user.last_name.as_str())
            && check(self.email.as_deref(), user.email.as_str())
            && check(self.age.as_ref(), &user.age)
            && check(self.height.as_ref(), &user.height)
            && check(self.active.as_ref(), &user.active)
            && check(self.created_on.as_deref(), user.created_on.as_str())
    }
}
