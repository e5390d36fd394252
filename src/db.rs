use sqlx::{postgres::PgPoolOptions, Connection, PgPool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageConnectError {
    #[error("error connecting to the database")]
    Connect(#[source] sqlx::Error),
    #[error("cannot ping the database")]
    Ping(#[source] sqlx::Error),
}

/// Opens the pool and checks that one connection answers.
pub async fn connect(connection_string: &str) -> Result<PgPool, StorageConnectError> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(connection_string)
        .await
        .map_err(StorageConnectError::Connect)?;

    let mut conn = db.acquire().await.map_err(StorageConnectError::Ping)?;
    conn.ping().await.map_err(StorageConnectError::Ping)?;

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let err = connect("not a url").await.unwrap_err();
        assert!(matches!(err, StorageConnectError::Connect(_)));
    }
}
