//! In-memory user store, used for tests and the `memory` backend.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{NameIndexKey, NameQuery, Page, PrimaryKey, ScanFilter, ScanRequest, UserStore};
use crate::entities::{User, UserUpdate};
use crate::types::{StoreError, StoreResult};

/// Records keyed by id; iteration order is primary key order.
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<BTreeMap<String, User>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }
}

fn lookahead(limit: Option<u32>) -> usize {
    limit.map_or(usize::MAX, |limit| limit as usize + 1)
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn put(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn scan(&self, request: ScanRequest) -> StoreResult<Page<PrimaryKey>> {
        let users = self.users.read().await;
        let lower = match &request.exclusive_start_key {
            Some(key) => Bound::Excluded(key.id.clone()),
            None => Bound::Unbounded,
        };

        let rows: Vec<User> = users
            .range((lower, Bound::Unbounded))
            .map(|(_, user)| user)
            .filter(|user| request.filter == ScanFilter::All || user.is_active())
            .take(lookahead(request.limit))
            .cloned()
            .collect();

        Ok(Page::from_rows(rows, request.limit, |user| PrimaryKey {
            id: user.id.clone(),
        }))
    }

    async fn query_by_name(&self, query: NameQuery) -> StoreResult<Page<NameIndexKey>> {
        let users = self.users.read().await;
        let matching = users.values().filter(|user| user.name == query.name);
        let ordered: Box<dyn Iterator<Item = &User>> = if query.scan_forward {
            Box::new(matching)
        } else {
            Box::new(matching.rev())
        };

        let start = query.exclusive_start_key.as_ref().map(|key| key.id.as_str());
        let rows: Vec<User> = ordered
            .filter(|user| match start {
                Some(start) if query.scan_forward => user.id.as_str() > start,
                Some(start) => user.id.as_str() < start,
                None => true,
            })
            .take(lookahead(query.limit))
            .cloned()
            .collect();

        Ok(Page::from_rows(rows, query.limit, |user| NameIndexKey {
            name: user.name.clone(),
            id: user.id.clone(),
        }))
    }

    async fn update(&self, id: &str, update: UserUpdate) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        match update {
            UserUpdate::Profile { name, email } => {
                user.name = name;
                user.email = email;
            }
            UserUpdate::MarkDeleted => user.is_deleted = Some(true),
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.users.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryUserRepository {
        MemoryUserRepository::with_users([
            User::new("u1", "Ada", "ada@example.com"),
            User::new("u2", "Bob", "bob@example.com"),
            User::new("u3", "Ada", "ada3@example.com"),
        ])
    }

    #[tokio::test]
    async fn put_replaces_whole_record() {
        let store = seeded();
        store.update("u1", UserUpdate::MarkDeleted).await.unwrap();

        store
            .put(&User::new("u1", "Ada L", "ada@example.org"))
            .await
            .unwrap();

        let user = store.get("u1").await.unwrap();
        assert_eq!(user, User::new("u1", "Ada L", "ada@example.org"));
    }

    #[tokio::test]
    async fn update_of_missing_id_creates_nothing() {
        let store = seeded();
        let error = store.update("ghost", UserUpdate::MarkDeleted).await.unwrap_err();
        assert!(matches!(error, StoreError::NotFound(id) if id == "ghost"));
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn descending_query_resumes_below_start_key() {
        let store = seeded();
        let mut query = NameQuery::new("Ada");
        query.scan_forward = false;
        query.exclusive_start_key = Some(NameIndexKey {
            name: "Ada".into(),
            id: "u3".into(),
        });

        let page = store.query_by_name(query).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["u1"]);
        assert!(page.last_evaluated_key.is_none());
    }
}
