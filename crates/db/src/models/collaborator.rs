//! Document collaborator models.

use keepsake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `document_collaborators` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: DbId,
    pub document_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub status: String,
    pub invited_by_id: DbId,
    pub accepted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Collaborator joined with the collaborating user's public fields.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CollaboratorWithUser {
    pub id: DbId,
    pub document_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub status: String,
    pub accepted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub user_name: String,
    pub user_email: String,
    pub user_image_url: Option<String>,
}
