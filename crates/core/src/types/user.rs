//! User accounts.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::status::Role;

/// A user account.
///
/// The password is write-only and never appears on this type; see
/// [`UserInput`](super::input::UserInput) for the write side. The email is
/// kept as a plain string because records come from the backend, which has
/// already validated them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl User {
    /// Whether this account may use the admin console.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
