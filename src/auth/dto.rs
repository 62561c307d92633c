use serde::{Deserialize, Serialize};

use super::repo_types::User;

/// Request body for user registration. Fields are optional so a missing
/// one is reported as a 400 with a readable message.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

/// Returned by a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: bool,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub public_id: String,
    pub name: String,
    pub admin: bool,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            public_id: u.public_id,
            name: u.name,
            admin: u.admin,
        }
    }
}
