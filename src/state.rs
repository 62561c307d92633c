use crate::config::AppConfig;
use crate::db::{self, Pools};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Read pool.
    pub db: SqlitePool,
    /// Single-connection pool every mutation goes through.
    pub writer: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pools = db::connect(&config.database_url, config.max_connections).await?;
        Ok(Self::from_parts(pools, config))
    }

    pub fn from_parts(pools: Pools, config: Arc<AppConfig>) -> Self {
        Self {
            db: pools.reader,
            writer: pools.writer,
            config,
        }
    }

    /// Fresh in-memory database with the schema applied and a fixed test secret.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let db = db::connect_in_memory()
            .await
            .expect("in-memory database should open");

        let pools = Pools {
            reader: db.clone(),
            writer: db,
        };
        Self::from_parts(pools, test_config("sqlite::memory:", 1))
    }

    /// File-backed database with the production pool layout.
    #[cfg(test)]
    pub async fn on_disk(path: &std::path::Path) -> Self {
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pools = db::connect(&url, 5)
            .await
            .expect("on-disk database should open");
        Self::from_parts(pools, test_config(&url, 5))
    }
}

#[cfg(test)]
fn test_config(database_url: &str, max_connections: u32) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        database_url: database_url.into(),
        max_connections,
        jwt: crate::config::JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 45,
        },
    })
}
