use serde::{Deserialize, Serialize};

/// JWT payload binding a token to a user's public identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub public_id: String, // users.public_id, never the internal row id
    pub iat: usize,        // issued at (unix timestamp)
    pub exp: usize,        // expires at (unix timestamp)
    pub iss: String,       // issuer
    pub aud: String,       // audience
}
