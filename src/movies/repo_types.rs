use serde::Serialize;
use sqlx::FromRow;

/// Row as stored in `movies`.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director_id: i64,
}

/// Movie joined with its director's name, as returned by reads.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    pub director_id: i64,
    pub director_name: String,
}
