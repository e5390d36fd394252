use axum::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::users::repo_types::User;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("error fetching users from database")]
    Query(#[source] sqlx::Error),
    #[error("error scanning user row")]
    Scan(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => StorageError::Scan(e),
            other => StorageError::Query(other),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in whatever order the store returns them.
    async fn list_users(&self) -> Result<Vec<User>, StorageError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let users = sqlx::query_as::<_, User>(r#"SELECT * FROM users"#)
            .fetch_all(&self.db)
            .await?;
        Ok(users)
    }
}
