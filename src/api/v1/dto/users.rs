/*
 * Responsibility
 * - Users response DTOs
 */
use auth::Credential;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub name: Option<String>,
}

impl From<Credential> for UserResponse {
    fn from(c: Credential) -> Self {
        Self {
            email: c.email,
            name: c.name,
        }
    }
}
