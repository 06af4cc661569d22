//! User entity definitions

use serde::{Deserialize, Serialize};

/// A record in the `Users` table.
///
/// `is_deleted` is the soft-delete marker; an absent flag reads the same as `false`
/// and is omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            is_deleted: None,
        }
    }

    /// Whether the record shows up in active-only listings.
    pub fn is_active(&self) -> bool {
        !self.is_deleted.unwrap_or(false)
    }
}

/// Targeted attribute update applied without reading the record first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserUpdate {
    /// Overwrite `name` and `email`.
    Profile { name: String, email: String },
    /// Set `isDeleted = true`.
    MarkDeleted,
}
