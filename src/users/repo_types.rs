use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{macros::datetime, OffsetDateTime};

/// Placeholder for a timestamp the store has not assigned yet.
pub const UNSET_CREATED_AT: OffsetDateTime = datetime!(0001-01-01 0:00 UTC);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub link: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// A user that has not been persisted: id and timestamp stay at zero values.
    pub fn pending(name: String, email: String, link: String) -> Self {
        Self {
            id: 0,
            name,
            email,
            link,
            created_at: UNSET_CREATED_AT,
        }
    }
}
