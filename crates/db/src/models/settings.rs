//! User settings model and DTOs.

use keepsake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSettings {
    pub user_id: DbId,
    pub theme: String,
    pub notifications: bool,
    pub cookies: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating settings. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserSettings {
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    pub cookies: Option<bool>,
}
