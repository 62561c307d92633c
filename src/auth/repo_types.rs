use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,               // internal row id, never handed out
    pub public_id: String,     // stable external identifier carried in tokens
    pub name: String,          // login name, unique
    pub password_hash: String, // Argon2 PHC string
    pub admin: bool,
}
