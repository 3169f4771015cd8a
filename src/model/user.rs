use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "username": "admin",
        "nombre_completo": "Administrador",
        "role": "admin"
    })
)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(rename = "nombre_completo")]
    pub display_name: String,
    pub role: Role,
}

impl User {
    /// Name shown on attendance records, falling back to the username.
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// Directory entry as stored in the fixture. Passwords are plaintext.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCredential {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub user: User,
    #[schema(example = "local-token-1704096000000-k3j9x0a1b2")]
    pub token: String,
}
