//! SQLite-backed request store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::types::{RequestStatus, SupportRequest};
use crate::{Error, Result};

/// Persistent storage of support requests.
///
/// Every mutating operation runs inside a single transaction; a failure
/// mid-operation rolls the whole change back, so partial state is never
/// observable.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn insert(
        &self,
        owner_id: Option<i64>,
        title: &str,
        content: &str,
        status: RequestStatus,
    ) -> Result<SupportRequest>;

    async fn get(&self, id: i64) -> Result<Option<SupportRequest>>;

    /// Requests owned by `owner_id`, newest first.
    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<SupportRequest>>;

    /// All requests, newest first.
    async fn list_all(&self) -> Result<Vec<SupportRequest>>;

    /// Requests whose stored status equals `status` exactly.
    async fn list_by_status(&self, status: &str) -> Result<Vec<SupportRequest>>;

    /// Replace title and content. Returns the updated record, or `None`
    /// when the id does not exist.
    async fn update_content(
        &self,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<Option<SupportRequest>>;

    /// Replace the status. Returns the updated record, or `None` when the
    /// id does not exist.
    async fn update_status(&self, id: i64, status: RequestStatus)
        -> Result<Option<SupportRequest>>;

    /// Returns false when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool>;
}

const REQUEST_COLUMNS: &str = "id, title, content, status, created_at, user_id";

/// Row as stored; status is mapped to the closed enum at the edge.
#[derive(sqlx::FromRow)]
struct RequestRow {
    id: i64,
    title: String,
    content: String,
    status: String,
    created_at: DateTime<Utc>,
    user_id: Option<i64>,
}

impl TryFrom<RequestRow> for SupportRequest {
    type Error = Error;

    fn try_from(row: RequestRow) -> Result<SupportRequest> {
        let status = row
            .status
            .parse::<RequestStatus>()
            .map_err(|e| Error::Storage(format!("request {}: {}", row.id, e)))?;

        Ok(SupportRequest {
            id: row.id,
            title: row.title,
            content: row.content,
            status,
            created_at: row.created_at,
            user_id: row.user_id,
        })
    }
}

fn map_rows(rows: Vec<RequestRow>) -> Result<Vec<SupportRequest>> {
    rows.into_iter().map(SupportRequest::try_from).collect()
}

#[derive(Clone)]
pub struct SqliteRequestStore {
    pool: SqlitePool,
}

impl SqliteRequestStore {
    /// Wrap an existing pool and make sure the `requests` table exists.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'new',
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                user_id INTEGER REFERENCES users(id)
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RequestStore for SqliteRequestStore {
    async fn insert(
        &self,
        owner_id: Option<i64>,
        title: &str,
        content: &str,
        status: RequestStatus,
    ) -> Result<SupportRequest> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO requests (title, content, status, created_at, user_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(title)
        .bind(content)
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        let row = sqlx::query_as::<_, RequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(request_id = id, "request created");

        row.try_into()
    }

    async fn get(&self, id: i64) -> Result<Option<SupportRequest>> {
        let row = sqlx::query_as::<_, RequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SupportRequest::try_from).transpose()
    }

    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<SupportRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        map_rows(rows)
    }

    async fn list_all(&self) -> Result<Vec<SupportRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        map_rows(rows)
    }

    async fn list_by_status(&self, status: &str) -> Result<Vec<SupportRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests
             WHERE status = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        map_rows(rows)
    }

    async fn update_content(
        &self,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<Option<SupportRequest>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE requests SET title = ?, content = ? WHERE id = ?")
            .bind(title)
            .bind(content)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, RequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Some(row.try_into()).transpose()
    }

    async fn update_status(
        &self,
        id: i64,
        status: RequestStatus,
    ) -> Result<Option<SupportRequest>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE requests SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, RequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(request_id = id, status = %status, "status updated");

        Some(row.try_into()).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
