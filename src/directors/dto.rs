use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateDirectorRequest {
    pub name: Option<String>,
}

/// Absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateDirectorRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedMovies {
    pub deleted_movies: u64,
}
