//! Document invitation models and DTOs.

use keepsake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `document_invitations` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Invitation {
    pub id: DbId,
    pub document_id: DbId,
    pub email: String,
    pub token: String,
    pub inviter_id: DbId,
    pub status: String,
    pub expires_at: Option<Timestamp>,
    pub accepted_by_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inviting someone to a document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvitation {
    pub email: String,
}

/// Invitation joined with its document and the document owner, shown on the
/// invite acceptance page. The token itself is not echoed back.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvitationPreview {
    pub id: DbId,
    pub email: String,
    pub status: String,
    pub expires_at: Option<Timestamp>,
    pub document_id: DbId,
    pub document_title: String,
    pub document_slug: String,
    pub owner_id: DbId,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_image_url: Option<String>,
}
