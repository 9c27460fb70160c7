use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub genre: String,
    pub release_year: i64,
    #[serde(serialize_with = "serialize_number")]
    pub rating: f64,
    pub actor: String,
    #[serde(serialize_with = "serialize_number")]
    pub box_office_collection: f64,
}

/// Whole values go out as JSON integers (`220`, not `220.0`).
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0}")]
    NotFound(String),
    #[error("Database not connected")]
    ConnectionUnavailable,
    #[error("{0}")]
    QueryFailed(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;
