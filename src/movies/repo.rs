use sqlx::SqliteExecutor;

use crate::movies::repo_types::{Movie, MovieDetails};

const DETAILS_SELECT: &str = r#"
    SELECT m.id, m.title, m.director_id, d.name AS director_name
      FROM movies m
      JOIN directors d ON d.id = m.director_id
"#;

pub async fn list(db: impl SqliteExecutor<'_>) -> sqlx::Result<Vec<MovieDetails>> {
    sqlx::query_as::<_, MovieDetails>(&format!("{DETAILS_SELECT} ORDER BY m.id"))
        .fetch_all(db)
        .await
}

pub async fn list_by_director(
    db: impl SqliteExecutor<'_>,
    director_id: i64,
) -> sqlx::Result<Vec<MovieDetails>> {
    sqlx::query_as::<_, MovieDetails>(&format!(
        "{DETAILS_SELECT} WHERE m.director_id = ?1 ORDER BY m.id"
    ))
    .bind(director_id)
    .fetch_all(db)
    .await
}

pub async fn find_details(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> sqlx::Result<Option<MovieDetails>> {
    sqlx::query_as::<_, MovieDetails>(&format!("{DETAILS_SELECT} WHERE m.id = ?1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> sqlx::Result<Option<Movie>> {
    sqlx::query_as::<_, Movie>("SELECT id, title, director_id FROM movies WHERE id = ?1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn title_taken(db: impl SqliteExecutor<'_>, title: &str) -> sqlx::Result<bool> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies WHERE title = ?1")
        .bind(title)
        .fetch_one(db)
        .await?;
    Ok(count > 0)
}

pub async fn insert(
    db: impl SqliteExecutor<'_>,
    title: &str,
    director_id: i64,
) -> sqlx::Result<Movie> {
    sqlx::query_as::<_, Movie>(
        r#"
        INSERT INTO movies (title, director_id)
        VALUES (?1, ?2)
        RETURNING id, title, director_id
        "#,
    )
    .bind(title)
    .bind(director_id)
    .fetch_one(db)
    .await
}

pub async fn update(db: impl SqliteExecutor<'_>, movie: &Movie) -> sqlx::Result<Movie> {
    sqlx::query_as::<_, Movie>(
        r#"
        UPDATE movies
           SET title = ?2, director_id = ?3
         WHERE id = ?1
        RETURNING id, title, director_id
        "#,
    )
    .bind(movie.id)
    .bind(&movie.title)
    .bind(movie.director_id)
    .fetch_one(db)
    .await
}

pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM movies WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_by_director(db: impl SqliteExecutor<'_>, director_id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM movies WHERE director_id = ?1")
        .bind(director_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
