use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub director_id: Option<i64>,
}

/// Absent fields keep their stored value. A present `director_id` is
/// re-validated against `directors`.
#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub director_id: Option<i64>,
}
