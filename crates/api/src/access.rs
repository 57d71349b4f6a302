//! Document access lookups.
//!
//! Loads the document and the viewer's collaborator status, then applies the
//! rules in [`keepsake_core::access`].

use keepsake_core::access::{self, AccessLevel};
use keepsake_core::error::CoreError;
use keepsake_core::types::DbId;
use keepsake_db::models::document::Document;
use keepsake_db::repositories::{CollaboratorRepo, DocumentRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// A document together with what the current viewer may do with it.
#[derive(Debug, Clone)]
pub struct DocumentAccess {
    pub document: Document,
    pub level: AccessLevel,
}

/// Resolve `viewer`'s access to a document.
///
/// `None` when the document is missing or the viewer may not see it.
pub async fn resolve_access(
    pool: &PgPool,
    document_id: DbId,
    viewer: Option<DbId>,
) -> Result<Option<DocumentAccess>, sqlx::Error> {
    let Some(document) = DocumentRepo::find_by_id(pool, document_id).await? else {
        return Ok(None);
    };
    access_to(pool, document, viewer).await
}

/// Same as [`resolve_access`] for an already loaded document.
pub async fn access_to(
    pool: &PgPool,
    document: Document,
    viewer: Option<DbId>,
) -> Result<Option<DocumentAccess>, sqlx::Error> {
    let is_active_collaborator = match viewer {
        Some(user_id) if user_id != document.owner_id => {
            CollaboratorRepo::is_active(pool, document.id, user_id).await?
        }
        _ => false,
    };

    Ok(
        access::resolve(document.owner_id, &document.visibility, viewer, is_active_collaborator)
            .map(|level| DocumentAccess { document, level }),
    )
}

/// Resolve access for a read, reporting invisible documents as not found.
pub async fn require_viewer(
    pool: &PgPool,
    document_id: DbId,
    viewer: Option<DbId>,
) -> AppResult<DocumentAccess> {
    resolve_access(pool, document_id, viewer)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Document",
                id: document_id,
            })
        })
}

/// Require the viewer to own the document.
pub async fn assert_owner(
    pool: &PgPool,
    document_id: DbId,
    viewer: Option<DbId>,
) -> AppResult<Document> {
    let resolved = match viewer {
        Some(_) => resolve_access(pool, document_id, viewer).await?,
        None => None,
    };
    let level = resolved.as_ref().map(|a| a.level);
    access::require_owner(viewer, level)?;
    resolved.map(|a| a.document).ok_or_else(|| {
        AppError::InternalError("owner check passed without a document".into())
    })
}

/// Require the viewer to be the owner or an active collaborator.
pub async fn assert_contributor(
    pool: &PgPool,
    document_id: DbId,
    viewer: Option<DbId>,
) -> AppResult<DocumentAccess> {
    let resolved = match viewer {
        Some(_) => resolve_access(pool, document_id, viewer).await?,
        None => None,
    };
    access::require_contributor(viewer, resolved.as_ref().map(|a| a.level))?;
    resolved.ok_or_else(|| {
        AppError::InternalError("contributor check passed without a document".into())
    })
}
