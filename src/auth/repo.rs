use crate::auth::repo_types::User;
use sqlx::SqliteExecutor;
use uuid::Uuid;

impl User {
    /// Find a user by login name.
    pub async fn find_by_name<'e>(
        db: impl SqliteExecutor<'e>,
        name: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, public_id, name, password_hash, admin
            FROM users
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await
    }

    /// Resolve the identity carried by a token.
    pub async fn find_by_public_id<'e>(
        db: impl SqliteExecutor<'e>,
        public_id: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, public_id, name, password_hash, admin
            FROM users
            WHERE public_id = ?1
            "#,
        )
        .bind(public_id)
        .fetch_optional(db)
        .await
    }

    /// Insert a user with a freshly generated public identifier.
    pub async fn create<'e>(
        db: impl SqliteExecutor<'e>,
        name: &str,
        password_hash: &str,
        admin: bool,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (public_id, name, password_hash, admin)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, public_id, name, password_hash, admin
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(password_hash)
        .bind(admin)
        .fetch_one(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn create_then_lookup_by_name_and_public_id() {
        let pool = db::connect_in_memory().await.unwrap();
        let created = User::create(&pool, "alice", "hash", true).await.unwrap();
        assert!(Uuid::parse_str(&created.public_id).is_ok());
        assert!(created.admin);

        let by_name = User::find_by_name(&pool, "alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        let by_public = User::find_by_public_id(&pool, &created.public_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_public.name, "alice");

        assert!(User::find_by_name(&pool, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_name_is_a_unique_violation() {
        let pool = db::connect_in_memory().await.unwrap();
        User::create(&pool, "alice", "hash", false).await.unwrap();
        let err = User::create(&pool, "alice", "other", false).await.unwrap_err();
        assert!(db::is_unique_violation(&err));
    }
}
