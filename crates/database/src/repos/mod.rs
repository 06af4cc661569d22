//! Record store abstraction and its implementations.
//!
//! Every store operation is a single call: whole-record `put`, an optionally filtered
//! and bounded `scan`, an index `query_by_name`, a targeted `update`, and `delete`.
//! Bounded reads return a page plus the key of its last item when more data remains;
//! passing that key back as `exclusive_start_key` resumes after it.

pub mod memory_repository;
pub mod user_repository;

pub use memory_repository::MemoryUserRepository;
pub use user_repository::UserRepository;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{User, UserUpdate};
use crate::types::StoreResult;

/// Name of the table holding user records.
pub const TABLE_NAME: &str = "Users";

/// Secondary index over `(name, id)`.
pub const NAME_INDEX: &str = "NameIndex";

/// Native cursor of a table scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimaryKey {
    pub id: String,
}

/// Native cursor of a `NameIndex` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameIndexKey {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanFilter {
    #[default]
    All,
    /// Only records whose `isDeleted` flag is absent or `false`.
    ActiveOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanRequest {
    pub filter: ScanFilter,
    pub limit: Option<u32>,
    pub exclusive_start_key: Option<PrimaryKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    pub name: String,
    pub limit: Option<u32>,
    pub exclusive_start_key: Option<NameIndexKey>,
    /// Ascending `id` order when true, descending otherwise.
    pub scan_forward: bool,
}

impl NameQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limit: None,
            exclusive_start_key: None,
            scan_forward: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<K> {
    pub items: Vec<User>,
    pub last_evaluated_key: Option<K>,
}

impl<K> Page<K> {
    /// Build a page from rows fetched with one extra row of lookahead.
    pub(crate) fn from_rows(
        mut rows: Vec<User>,
        limit: Option<u32>,
        key_of: impl Fn(&User) -> K,
    ) -> Self {
        let last_evaluated_key = match limit {
            Some(limit) if rows.len() > limit as usize => {
                rows.truncate(limit as usize);
                rows.last().map(key_of)
            }
            _ => None,
        };

        Self {
            items: rows,
            last_evaluated_key,
        }
    }
}

/// The record store the handlers talk to.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or fully replace a record (last write wins).
    async fn put(&self, user: &User) -> StoreResult<()>;

    /// Read records in primary key order.
    async fn scan(&self, request: ScanRequest) -> StoreResult<Page<PrimaryKey>>;

    /// Read records with an exact `name` through `NameIndex`, ordered by `id`.
    async fn query_by_name(&self, query: NameQuery) -> StoreResult<Page<NameIndexKey>>;

    /// Apply a targeted update and return the full record afterwards.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) when no record
    /// has this id; nothing is created in that case.
    async fn update(&self, id: &str, update: UserUpdate) -> StoreResult<User>;

    /// Remove a record. Removing a missing id succeeds.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(ids: &[&str]) -> Vec<User> {
        ids.iter()
            .map(|id| User::new(*id, format!("name-{id}"), format!("{id}@example.com")))
            .collect()
    }

    #[test]
    fn page_with_lookahead_row_reports_last_key() {
        let page = Page::from_rows(users(&["a", "b", "c"]), Some(2), |u| u.id.clone());
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.last_evaluated_key.as_deref(), Some("b"));
    }

    #[test]
    fn exhausted_page_has_no_key() {
        let page = Page::from_rows(users(&["a", "b"]), Some(2), |u| u.id.clone());
        assert_eq!(page.items.len(), 2);
        assert!(page.last_evaluated_key.is_none());

        let unbounded = Page::from_rows(users(&["a", "b", "c"]), None, |u| u.id.clone());
        assert_eq!(unbounded.items.len(), 3);
        assert!(unbounded.last_evaluated_key.is_none());
    }

    #[test]
    fn cursor_keys_use_store_attribute_names() {
        let key = PrimaryKey { id: "u3".into() };
        assert_eq!(serde_json::to_string(&key).unwrap(), r#"{"id":"u3"}"#);

        let rejected = serde_json::from_str::<PrimaryKey>(r#"{"id":"u3","extra":1}"#);
        assert!(rejected.is_err());
    }
}
