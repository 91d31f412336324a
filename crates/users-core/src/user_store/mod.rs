//! SQLite-backed credential store

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;

use crate::types::User;
use crate::{Error, Result};

/// Open a SQLite pool with the settings every store in the service shares.
///
/// WAL mode plus a generous busy timeout lets concurrent writers contend on
/// the same database file without surfacing spurious lock errors; a
/// uniqueness race that survives the timeout still fails cleanly on the
/// UNIQUE constraint.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| Error::Config(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Persistent storage of user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Username and email must be unique.
    async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Current administrator flag, read fresh from storage on every call so
    /// role changes take effect immediately.
    async fn is_partner(&self, id: i64) -> Result<bool>;
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, is_partner";

#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Wrap an existing pool and make sure the `users` table exists.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                is_partner INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Open a store on its own pool; convenience for tests and examples.
    pub async fn open(database_url: &str) -> Result<Self> {
        Self::new(connect(database_url).await?).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        // Pre-check for a friendly message; the UNIQUE constraints below
        // remain the authoritative guard under concurrent registration.
        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM users WHERE username = ? OR email = ? LIMIT 1",
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        if taken.is_some() {
            return Err(Error::Conflict(
                "A user with this username or email".to_string(),
            ));
        }

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(user_id = id, username, "user created");

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn is_partner(&self, id: i64) -> Result<bool> {
        let flag = sqlx::query_scalar::<_, bool>("SELECT is_partner FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        flag.ok_or_else(|| Error::NotFound("User".to_string()))
    }
}
