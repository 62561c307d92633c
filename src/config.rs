use anyhow::Context;
use serde::Deserialize;

/// One year. Longer lifetimes are refused at startup.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Signing and validation settings for access tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://cinedex.db?mode=rwc".into());
        let max_connections = parse_or("DB_MAX_CONNECTIONS", 5);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cinedex".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cinedex-users".into()),
            ttl_minutes: token_ttl(parse_or("JWT_TTL_MINUTES", 45))?,
        };
        Ok(Self {
            database_url,
            max_connections,
            jwt,
        })
    }
}

fn token_ttl(minutes: i64) -> anyhow::Result<i64> {
    anyhow::ensure!(
        (1..=MAX_TTL_MINUTES).contains(&minutes),
        "JWT_TTL_MINUTES must be between 1 and {}, got {}",
        MAX_TTL_MINUTES,
        minutes
    );
    Ok(minutes)
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_on_missing_or_garbage() {
        assert_eq!(parse_or::<i64>("CINEDEX_TEST_UNSET_VAR", 45), 45);
        std::env::set_var("CINEDEX_TEST_GARBAGE_VAR", "forty-five");
        assert_eq!(parse_or::<i64>("CINEDEX_TEST_GARBAGE_VAR", 45), 45);
        std::env::set_var("CINEDEX_TEST_NUMBER_VAR", "30");
        assert_eq!(parse_or::<i64>("CINEDEX_TEST_NUMBER_VAR", 45), 30);
    }

    #[test]
    fn token_ttl_must_be_positive_and_bounded() {
        assert_eq!(token_ttl(45).unwrap(), 45);
        assert_eq!(token_ttl(MAX_TTL_MINUTES).unwrap(), MAX_TTL_MINUTES);
        assert!(token_ttl(0).is_err());
        assert!(token_ttl(-5).is_err());
        assert!(token_ttl(i64::MAX).is_err());
    }
}
