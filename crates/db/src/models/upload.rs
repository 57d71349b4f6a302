//! Uploaded file models.

use keepsake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_uploads` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Upload {
    pub id: DbId,
    pub user_id: DbId,
    pub entry_id: DbId,
    pub url: String,
    pub key: String,
    pub is_primary: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a completed upload.
#[derive(Debug, Clone)]
pub struct CreateUpload {
    pub user_id: DbId,
    pub entry_id: DbId,
    pub url: String,
    pub key: String,
    pub is_primary: bool,
}
