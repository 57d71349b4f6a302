//! User entity model and DTOs.

use keepsake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// `external_id` is the authentication provider's subject for this user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public-facing user fields embedded in documents, comments and entries.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image_url: user.image_url.clone(),
        }
    }
}

/// DTO for inserting or refreshing a user from identity-provider claims.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUser {
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}
