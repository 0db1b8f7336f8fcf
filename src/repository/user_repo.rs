// ==========================================
// User store
// ==========================================
// Accounts for the HTTP API, kept apart from the catalogue database so an
// import can never touch credentials. Two backends: SQLite for real runs,
// in-memory for tests and throwaway setups.
//
// Superuser rows are special: they never appear in listings and cannot be
// deleted through the store.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{UserRecord, SCOPE_CATALOGUE, SCOPE_USER_MANAGER};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::Mutex;

/// Account storage backend
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Record by username, superusers included
    async fn lookup(&self, username: &str) -> RepositoryResult<Option<UserRecord>>;

    /// Insert a new account; an existing username is a unique violation
    async fn add_user(&self, user: UserRecord) -> RepositoryResult<()>;

    /// Remove an account. Deleting a superuser or an unknown username is
    /// a silent no-op.
    async fn delete_user(&self, username: &str) -> RepositoryResult<()>;

    /// Usernames of all regular accounts, superusers excluded
    async fn list_users(&self) -> RepositoryResult<Vec<String>>;

    /// Create the superuser account when it does not exist yet; an
    /// existing account is left untouched
    async fn ensure_superuser(&self, username: &str, password_hash: &str) -> RepositoryResult<()>;
}

fn superuser_record(username: &str, password_hash: &str) -> UserRecord {
    UserRecord {
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        scopes: vec![SCOPE_CATALOGUE.to_string(), SCOPE_USER_MANAGER.to_string()],
        su: true,
    }
}

// ==========================================
// SqliteUserStore
// ==========================================
pub struct SqliteUserStore {
    db_path: String,
}

impl SqliteUserStore {
    /// Open the store and make sure the users table exists
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.initial_setup()?;
        Ok(store)
    }

    fn connection(&self) -> RepositoryResult<Connection> {
        open_sqlite_connection(&self.db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))
    }

    fn initial_setup(&self) -> RepositoryResult<()> {
        let conn = self.connection()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password TEXT NOT NULL,
                scopes TEXT NOT NULL,
                su INTEGER NOT NULL DEFAULT 0
            );",
        )?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='users'",
            [],
            |row| row.get(0),
        )?;
        if count != 1 {
            return Err(RepositoryError::InternalError(
                "users table missing after setup".to_string(),
            ));
        }
        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(UserRecord, String)> {
        Ok((
            UserRecord {
                username: row.get(0)?,
                password_hash: row.get(1)?,
                scopes: Vec::new(),
                su: row.get(3)?,
            },
            row.get::<_, String>(2)?,
        ))
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn lookup(&self, username: &str) -> RepositoryResult<Option<UserRecord>> {
        let conn = self.connection()?;
        let result = conn.query_row(
            "SELECT username, password, scopes, su FROM users WHERE username = ?1",
            params![username],
            Self::row_to_record,
        );

        match result {
            Ok((mut record, raw_scopes)) => {
                record.scopes = serde_json::from_str(&raw_scopes).map_err(|e| {
                    RepositoryError::FieldValueError {
                        field: "scopes".to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok(Some(record))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn add_user(&self, user: UserRecord) -> RepositoryResult<()> {
        let conn = self.connection()?;
        let scopes = serde_json::to_string(&user.scopes)
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;

        conn.execute(
            "INSERT INTO users (username, password, scopes, su) VALUES (?1, ?2, ?3, ?4)",
            params![user.username, user.password_hash, scopes, user.su as i32],
        )?;
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> RepositoryResult<()> {
        let conn = self.connection()?;
        conn.execute(
            "DELETE FROM users WHERE username = ?1 AND su != 1",
            params![username],
        )?;
        Ok(())
    }

    async fn list_users(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare("SELECT username FROM users WHERE su != 1 ORDER BY username")?;
        let users = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn ensure_superuser(&self, username: &str, password_hash: &str) -> RepositoryResult<()> {
        if self.lookup(username).await?.is_some() {
            return Ok(());
        }
        self.add_user(superuser_record(username, password_hash))
            .await
    }
}

// ==========================================
// InMemoryUserStore
// ==========================================
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn lookup(&self, username: &str) -> RepositoryResult<Option<UserRecord>> {
        let users = self
            .users
            .lock()
            .map_err(|e| RepositoryError::InternalError(format!("lock poisoned: {e}")))?;
        Ok(users.get(username).cloned())
    }

    async fn add_user(&self, user: UserRecord) -> RepositoryResult<()> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| RepositoryError::InternalError(format!("lock poisoned: {e}")))?;
        if users.contains_key(&user.username) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> RepositoryResult<()> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| RepositoryError::InternalError(format!("lock poisoned: {e}")))?;
        if users.get(username).map(|u| u.su) == Some(false) {
            users.remove(username);
        }
        Ok(())
    }

    async fn list_users(&self) -> RepositoryResult<Vec<String>> {
        let users = self
            .users
            .lock()
            .map_err(|e| RepositoryError::InternalError(format!("lock poisoned: {e}")))?;
        let mut names: Vec<String> = users
            .values()
            .filter(|u| !u.su)
            .map(|u| u.username.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn ensure_superuser(&self, username: &str, password_hash: &str) -> RepositoryResult<()> {
        if self.lookup(username).await?.is_some() {
            return Ok(());
        }
        self.add_user(superuser_record(username, password_hash))
            .await
    }
}
