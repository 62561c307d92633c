use std::{str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

/// Two pools over the same database file in WAL mode. Mutations run on
/// `writer`, which holds exactly one connection; everything else reads
/// through `reader`.
#[derive(Clone)]
pub struct Pools {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

/// Open both pools and bring the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Pools> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let writer = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options.clone())
        .await
        .context("open writer pool")?;
    migrate(&writer).await?;

    let reader = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
        .context("open reader pool")?;

    Ok(Pools { reader, writer })
}

pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    tracing::debug!("migrations applied");
    Ok(())
}

/// In-memory database for tests. A single connection that never expires,
/// since every new connection to `:memory:` would see an empty database.
#[cfg(test)]
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("connect to in-memory database")?;
    migrate(&db).await?;
    Ok(db)
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.is_unique_violation())
}
