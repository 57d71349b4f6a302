//! Handlers for documents: listing, workspace detail, and owner edits.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use keepsake_core::cache_tags;
use keepsake_core::documents::{
    normalize_optional, validate_summary, validate_title, validate_visibility,
    DEFAULT_DOCUMENT_SLUG, VISIBILITY_PUBLIC,
};
use keepsake_core::error::CoreError;
use keepsake_core::slug::base_slug;
use keepsake_core::types::DbId;
use keepsake_db::models::document::{
    CreateDocument, Document, DocumentDetail, UpdateDocumentContent, UpdateDocumentMetadata,
    UpdateVisibility,
};
use keepsake_db::repositories::{CollaboratorRepo, DocumentRepo};

use crate::access::{self, DocumentAccess};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Response types
   -------------------------------------------------------------------------- */

/// What the viewer may do with a document.
#[derive(Debug, Serialize)]
pub struct ViewerAccess {
    pub is_owner: bool,
    pub is_active_collaborator: bool,
    pub can_comment: bool,
}

/// Workspace payload: document detail plus the viewer's access.
#[derive(Debug, Serialize)]
pub struct DocumentView {
    #[serde(flatten)]
    pub detail: DocumentDetail,
    pub access: ViewerAccess,
}

/* --------------------------------------------------------------------------
   Cache invalidation
   -------------------------------------------------------------------------- */

/// Invalidate the document's own tag, its owner's and every active
/// collaborator's listing, plus `extra` tags. The public listing is
/// invalidated when `include_public` is set.
pub(crate) async fn invalidate_document(
    state: &AppState,
    document: &Document,
    include_public: bool,
    extra: &[String],
) -> AppResult<()> {
    let mut tags = vec![
        cache_tags::document(document.id),
        cache_tags::document_list(document.owner_id),
    ];
    let collaborators = CollaboratorRepo::list_active_user_ids(&state.pool, document.id).await?;
    tags.extend(collaborators.into_iter().map(cache_tags::document_list));
    if include_public {
        tags.push(cache_tags::PUBLIC_DOCUMENTS.to_string());
    }
    tags.extend_from_slice(extra);
    state.cache.invalidate_tags(&tags).await;
    Ok(())
}

/* --------------------------------------------------------------------------
   Listing
   -------------------------------------------------------------------------- */

/// GET /documents
///
/// Documents the caller owns or collaborates on.
pub async fn list_documents(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tag = cache_tags::document_list(auth.user_id);
    let documents = state
        .cache
        .get_or_load(&tag, std::slice::from_ref(&tag), || {
            DocumentRepo::list_for_user(&state.pool, auth.user_id)
        })
        .await?;
    Ok(Json(DataResponse { data: documents }))
}

/// GET /documents/public
pub async fn list_public_documents(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tag = cache_tags::PUBLIC_DOCUMENTS.to_string();
    let documents = state
        .cache
        .get_or_load(&tag, std::slice::from_ref(&tag), || {
            DocumentRepo::list_public(&state.pool)
        })
        .await?;
    Ok(Json(DataResponse { data: documents }))
}

/* --------------------------------------------------------------------------
   Detail
   -------------------------------------------------------------------------- */

/// GET /documents/{id}
///
/// Workspace view. Private documents the viewer cannot see are reported as
/// not found.
pub async fn get_document(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let resolved = access::require_viewer(&state.pool, document_id, auth.user_id()).await?;
    let view = document_view(&state, resolved).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /documents/by-slug/{slug}
pub async fn get_document_by_slug(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let not_found = || {
        AppError::Core(CoreError::NotFoundByKey {
            entity: "Document",
            key: slug.clone(),
        })
    };
    let document = DocumentRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(not_found)?;
    let resolved = access::access_to(&state.pool, document, auth.user_id())
        .await?
        .ok_or_else(not_found)?;
    let view = document_view(&state, resolved).await?;
    Ok(Json(DataResponse { data: view }))
}

/// Load the cached detail for an accessible document. Invitations are
/// stripped for everyone but the owner.
async fn document_view(state: &AppState, resolved: DocumentAccess) -> AppResult<DocumentView> {
    let id = resolved.document.id;
    let key = format!("{}:detail", cache_tags::document(id));
    let tags = [cache_tags::document(id), cache_tags::document_invites(id)];
    let detail: Option<DocumentDetail> = state
        .cache
        .get_or_load(&key, &tags, || DocumentRepo::find_detail(&state.pool, id))
        .await?;
    let mut detail = detail.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Document",
        id,
    }))?;

    let level = resolved.level;
    if !level.is_owner {
        detail.invitations.clear();
    }

    Ok(DocumentView {
        detail,
        access: ViewerAccess {
            is_owner: level.is_owner,
            is_active_collaborator: level.is_active_collaborator,
            can_comment: level.is_contributor(),
        },
    })
}

/* --------------------------------------------------------------------------
   Mutations
   -------------------------------------------------------------------------- */

/// POST /documents
///
/// Create a document owned by the caller under a fresh slug.
pub async fn create_document(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    let summary = normalize_optional(input.summary);
    validate_summary(summary.as_deref())?;
    if let Some(ref visibility) = input.visibility {
        validate_visibility(visibility)?;
    }

    let title = input.title.trim().to_string();
    let base = base_slug(&title, DEFAULT_DOCUMENT_SLUG);
    let normalized = CreateDocument {
        title,
        summary,
        visibility: input.visibility,
        content: input.content,
    };

    let document =
        DocumentRepo::create_with_unique_slug(&state.pool, auth.user_id, &base, &normalized)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "Could not allocate a unique slug for this document".into(),
                ))
            })?;

    invalidate_document(
        &state,
        &document,
        document.visibility == VISIBILITY_PUBLIC,
        &[],
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        document_id = document.id,
        slug = %document.slug,
        "Document created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// PUT /documents/{id}/content
///
/// Replace the body. A `summary` field, when present, replaces the summary
/// too (empty clears it).
pub async fn update_content(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(input): Json<UpdateDocumentContent>,
) -> AppResult<impl IntoResponse> {
    access::assert_owner(&state.pool, document_id, auth.user_id()).await?;

    let summary = input.summary.map(|s| normalize_optional(Some(s)));
    if let Some(ref s) = summary {
        validate_summary(s.as_deref())?;
    }

    let document = DocumentRepo::update_content(
        &state.pool,
        document_id,
        &input.content,
        summary.as_ref().map(|s| s.as_deref()),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Document",
        id: document_id,
    }))?;

    invalidate_document(
        &state,
        &document,
        document.visibility == VISIBILITY_PUBLIC,
        &[cache_tags::document_comments(document_id)],
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id(),
        document_id,
        content_chars = document.content.chars().count(),
        "Document content updated"
    );

    Ok(Json(DataResponse { data: document }))
}

/// PUT /documents/{id}/metadata
pub async fn update_metadata(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(input): Json<UpdateDocumentMetadata>,
) -> AppResult<impl IntoResponse> {
    access::assert_owner(&state.pool, document_id, auth.user_id()).await?;

    validate_title(&input.title)?;
    let summary = normalize_optional(input.summary);
    validate_summary(summary.as_deref())?;

    let document = DocumentRepo::update_metadata(
        &state.pool,
        document_id,
        input.title.trim(),
        summary.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Document",
        id: document_id,
    }))?;

    invalidate_document(
        &state,
        &document,
        document.visibility == VISIBILITY_PUBLIC,
        &[],
    )
    .await?;

    tracing::info!(user_id = auth.user_id(), document_id, "Document metadata updated");

    Ok(Json(DataResponse { data: document }))
}

/// PUT /documents/{id}/visibility
pub async fn update_visibility(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(input): Json<UpdateVisibility>,
) -> AppResult<impl IntoResponse> {
    access::assert_owner(&state.pool, document_id, auth.user_id()).await?;
    validate_visibility(&input.visibility)?;

    let document = DocumentRepo::update_visibility(&state.pool, document_id, &input.visibility)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id: document_id,
        }))?;

    // Entering or leaving the public listing.
    invalidate_document(&state, &document, true, &[]).await?;

    tracing::info!(
        user_id = auth.user_id(),
        document_id,
        visibility = %document.visibility,
        "Document visibility changed"
    );

    Ok(Json(DataResponse { data: document }))
}
