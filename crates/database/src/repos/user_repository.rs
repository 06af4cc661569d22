//! SQLite-backed user store.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use super::{NameIndexKey, NameQuery, Page, PrimaryKey, ScanFilter, ScanRequest, UserStore};
use crate::entities::{User, UserUpdate};
use crate::types::{StoreError, StoreResult};

const USER_COLUMNS: &str = "id, name, email, is_deleted";

/// Repository for the `Users` table
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn put(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT OR REPLACE INTO "Users" (id, name, email, is_deleted) VALUES (?, ?, ?, ?)"#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.is_deleted)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn scan(&self, request: ScanRequest) -> StoreResult<Page<PrimaryKey>> {
        let mut sql = format!(r#"SELECT {USER_COLUMNS} FROM "Users" WHERE 1 = 1"#);
        if request.exclusive_start_key.is_some() {
            sql.push_str(" AND id > ?");
        }
        if request.filter == ScanFilter::ActiveOnly {
            sql.push_str(" AND (is_deleted IS NULL OR is_deleted = 0)");
        }
        sql.push_str(" ORDER BY id ASC");
        if request.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query = sqlx::query_as::<_, User>(&sql);
        if let Some(key) = &request.exclusive_start_key {
            query = query.bind(&key.id);
        }
        if let Some(limit) = request.limit {
            query = query.bind(i64::from(limit) + 1);
        }

        let rows = query.fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), filter = ?request.filter, "scanned users");

        Ok(Page::from_rows(rows, request.limit, |user| PrimaryKey {
            id: user.id.clone(),
        }))
    }

    async fn query_by_name(&self, query: NameQuery) -> StoreResult<Page<NameIndexKey>> {
        let mut sql = format!(
            r#"SELECT {USER_COLUMNS} FROM "Users" INDEXED BY "NameIndex" WHERE name = ?"#
        );
        if query.exclusive_start_key.is_some() {
            sql.push_str(if query.scan_forward {
                " AND id > ?"
            } else {
                " AND id < ?"
            });
        }
        sql.push_str(if query.scan_forward {
            " ORDER BY id ASC"
        } else {
            " ORDER BY id DESC"
        });
        if query.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut statement = sqlx::query_as::<_, User>(&sql).bind(&query.name);
        if let Some(key) = &query.exclusive_start_key {
            statement = statement.bind(&key.id);
        }
        if let Some(limit) = query.limit {
            statement = statement.bind(i64::from(limit) + 1);
        }

        let rows = statement.fetch_all(&self.pool).await?;

        Ok(Page::from_rows(rows, query.limit, |user| NameIndexKey {
            name: user.name.clone(),
            id: user.id.clone(),
        }))
    }

    async fn update(&self, id: &str, update: UserUpdate) -> StoreResult<User> {
        let updated = match update {
            UserUpdate::Profile { name, email } => {
                sqlx::query_as::<_, User>(
                    r#"UPDATE "Users" SET name = ?, email = ? WHERE id = ? RETURNING id, name, email, is_deleted"#,
                )
                .bind(name)
                .bind(email)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
            UserUpdate::MarkDeleted => {
                sqlx::query_as::<_, User>(
                    r#"UPDATE "Users" SET is_deleted = 1 WHERE id = ? RETURNING id, name, email, is_deleted"#,
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        updated.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM "Users" WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id, removed = result.rows_affected(), "deleted user");
        Ok(())
    }
}
