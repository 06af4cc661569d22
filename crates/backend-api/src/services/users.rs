//! User operations. Each method makes exactly one store call.

use std::sync::Arc;

use roster_database::{
    NameIndexKey, NameQuery, PrimaryKey, ScanFilter, ScanRequest, User, UserStore, UserUpdate,
};

use super::error::{ServiceError, StoreResultExt};
use super::sort::{sort_users, SortKey};
use crate::cursor::encode_scan_key;
use crate::Operation;

/// A bounded scan position: page size plus where the previous page stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub start: Option<PrimaryKey>,
}

/// One page of a scan with the encoded token for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersPage {
    pub items: Vec<User>,
    pub last_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// `desc` selects descending order; every other value ascends.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameLookup {
    pub name: String,
    pub limit: u32,
    pub order: SortOrder,
    /// Raw id of the last record of the previous page.
    pub last_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePage {
    pub items: Vec<User>,
    pub last_evaluated_key: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user: User) -> Result<(), ServiceError> {
        self.store.put(&user).await.during(Operation::CreateUser)
    }

    pub async fn list_active(&self) -> Result<Vec<User>, ServiceError> {
        let page = self
            .store
            .scan(ScanRequest {
                filter: ScanFilter::ActiveOnly,
                ..ScanRequest::default()
            })
            .await
            .during(Operation::GetUsers)?;
        Ok(page.items)
    }

    pub async fn paginate(&self, request: PageRequest) -> Result<UsersPage, ServiceError> {
        self.scan_page(request, Operation::PaginateUsers).await
    }

    /// Sorts the fetched page only; order across pages follows the scan.
    pub async fn paginate_sorted(
        &self,
        request: PageRequest,
        sort_key: SortKey,
    ) -> Result<UsersPage, ServiceError> {
        let mut page = self
            .scan_page(request, Operation::PaginateAndSortUsers)
            .await?;
        sort_users(&mut page.items, sort_key);
        Ok(page)
    }

    pub async fn query_by_name(&self, lookup: NameLookup) -> Result<NamePage, ServiceError> {
        let exclusive_start_key = lookup.last_key.map(|id| NameIndexKey {
            name: lookup.name.clone(),
            id,
        });
        let query = NameQuery {
            name: lookup.name,
            limit: Some(lookup.limit),
            exclusive_start_key,
            scan_forward: lookup.order == SortOrder::Ascending,
        };

        let page = self
            .store
            .query_by_name(query)
            .await
            .during(Operation::QueryUsersByName)?;

        Ok(NamePage {
            items: page.items,
            last_evaluated_key: page.last_evaluated_key.map(|key| key.id),
        })
    }

    pub async fn sort_all(&self, sort_key: SortKey) -> Result<Vec<User>, ServiceError> {
        let mut users = self
            .store
            .scan(ScanRequest::default())
            .await
            .during(Operation::SortUsers)?
            .items;
        sort_users(&mut users, sort_key);
        Ok(users)
    }

    pub async fn soft_delete(&self, id: &str) -> Result<(), ServiceError> {
        self.store
            .update(id, UserUpdate::MarkDeleted)
            .await
            .during(Operation::SoftDeleteUser)?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.store.delete(id).await.during(Operation::DeleteUser)
    }

    pub async fn update(
        &self,
        id: &str,
        name: String,
        email: String,
    ) -> Result<User, ServiceError> {
        self.store
            .update(id, UserUpdate::Profile { name, email })
            .await
            .during(Operation::UpdateUser)
    }

    async fn scan_page(
        &self,
        request: PageRequest,
        operation: Operation,
    ) -> Result<UsersPage, ServiceError> {
        let page = self
            .store
            .scan(ScanRequest {
                filter: ScanFilter::All,
                limit: Some(request.limit),
                exclusive_start_key: request.start,
            })
            .await
            .during(operation)?;

        let last_key = page
            .last_evaluated_key
            .map(|key| encode_scan_key(&key))
            .transpose()
            .map_err(|error| ServiceError::internal(operation, error.to_string()))?;

        Ok(UsersPage {
            items: page.items,
            last_key,
        })
    }
}
