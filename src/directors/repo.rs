use sqlx::{Sqlite, SqliteExecutor, Transaction};

use crate::directors::repo_types::Director;

pub async fn list(db: impl SqliteExecutor<'_>) -> sqlx::Result<Vec<Director>> {
    sqlx::query_as::<_, Director>(
        r#"
        SELECT id, name
          FROM directors
         ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> sqlx::Result<Option<Director>> {
    sqlx::query_as::<_, Director>("SELECT id, name FROM directors WHERE id = ?1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn name_taken(db: impl SqliteExecutor<'_>, name: &str) -> sqlx::Result<bool> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM directors WHERE name = ?1")
        .bind(name)
        .fetch_one(db)
        .await?;
    Ok(count > 0)
}

pub async fn insert(db: impl SqliteExecutor<'_>, name: &str) -> sqlx::Result<Director> {
    sqlx::query_as::<_, Director>(
        r#"
        INSERT INTO directors (name)
        VALUES (?1)
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(db)
    .await
}

pub async fn rename(db: impl SqliteExecutor<'_>, id: i64, name: &str) -> sqlx::Result<Director> {
    sqlx::query_as::<_, Director>(
        r#"
        UPDATE directors
           SET name = ?2
         WHERE id = ?1
        RETURNING id, name
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_one(db)
    .await
}

/// Delete a director and every movie that references it. Returns the number
/// of movies removed. Both statements run on the caller's transaction.
pub async fn delete_with_movies(tx: &mut Transaction<'_, Sqlite>, id: i64) -> sqlx::Result<u64> {
    let movies = sqlx::query("DELETE FROM movies WHERE director_id = ?1")
        .bind(id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM directors WHERE id = ?1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(movies)
}
