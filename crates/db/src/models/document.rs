//! Document models, listing rows, and DTOs.

use keepsake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::collaborator::CollaboratorWithUser;
use crate::models::invitation::Invitation;
use crate::models::user::UserSummary;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Document {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: Option<String>,
    pub visibility: String,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub title: String,
    pub summary: Option<String>,
    pub visibility: Option<String>,
    pub content: Option<String>,
}

/// DTO for replacing a document's body (and optionally its summary).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocumentContent {
    pub content: String,
    /// `None` leaves the summary untouched; `Some("")` clears it.
    pub summary: Option<String>,
}

/// DTO for editing a document's title and summary.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocumentMetadata {
    pub title: String,
    pub summary: Option<String>,
}

/// DTO for switching a document between private and public.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVisibility {
    pub visibility: String,
}

/* --------------------------------------------------------------------------
   Listing
   -------------------------------------------------------------------------- */

/// Flat listing row: document, owner, the viewer's collaborator row (if any)
/// and comment aggregates.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentSummaryRow {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub visibility: String,
    pub updated_at: Timestamp,
    pub owner_id: DbId,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_image_url: Option<String>,
    pub collaborator_id: Option<DbId>,
    pub collaborator_status: Option<String>,
    pub collaborator_role: Option<String>,
    pub comment_count: i64,
    pub pending_suggestions: i64,
}

/// The viewer's own collaborator row on a listed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerCollaboration {
    pub id: DbId,
    pub status: String,
    pub role: String,
}

/// Listing entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub visibility: String,
    pub updated_at: Timestamp,
    pub owner: UserSummary,
    pub collaborator: Option<ViewerCollaboration>,
    pub comment_count: i64,
    pub pending_suggestions: i64,
}

impl From<DocumentSummaryRow> for DocumentSummary {
    fn from(row: DocumentSummaryRow) -> Self {
        let collaborator = row.collaborator_id.map(|id| ViewerCollaboration {
            id,
            status: row.collaborator_status.unwrap_or_else(|| "active".into()),
            role: row.collaborator_role.unwrap_or_else(|| "commenter".into()),
        });
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            summary: row.summary,
            visibility: row.visibility,
            updated_at: row.updated_at,
            owner: UserSummary {
                id: row.owner_id,
                name: row.owner_name,
                email: row.owner_email,
                image_url: row.owner_image_url,
            },
            collaborator,
            comment_count: row.comment_count,
            pending_suggestions: row.pending_suggestions,
        }
    }
}

/// Workspace view of one document: the document, its owner, non-revoked
/// collaborators and non-revoked invitations.
///
/// Invitations are only shown to the owner; the API strips them otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDetail {
    #[serde(flatten)]
    pub document: Document,
    pub owner: UserSummary,
    pub collaborators: Vec<CollaboratorWithUser>,
    pub invitations: Vec<Invitation>,
}
