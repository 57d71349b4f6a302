//! Handlers for document comments and suggestion decisions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use keepsake_core::cache_tags;
use keepsake_core::documents::{
    ensure_status_editable, validate_comment, validate_comment_status, CommentDraft,
    COMMENT_KIND_ANNOTATION, SUGGESTION_APPROVED, SUGGESTION_REJECTED, VISIBILITY_PUBLIC,
};
use keepsake_core::error::CoreError;
use keepsake_core::suggestion::{self, Decision, SuggestionAnchor};
use keepsake_core::types::DbId;
use keepsake_db::models::comment::{build_threads, Comment, CreateComment, UpdateCommentStatus};
use keepsake_db::models::document::Document;
use keepsake_db::repositories::{CommentRepo, DocumentRepo};

use crate::access;
use crate::error::{AppError, AppResult};
use crate::handlers::documents::invalidate_document;
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for approving or rejecting a suggestion.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}

/// Outcome of a suggestion decision: the resolved comment and the document
/// as it stands afterwards.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub comment: Comment,
    pub document: Document,
}

fn comment_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Comment",
        id,
    })
}

/// GET /documents/{id}/comments
///
/// Threaded comments, oldest first. Anyone who can see the document may read.
pub async fn list_comments(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    access::require_viewer(&state.pool, document_id, auth.user_id()).await?;

    let tag = cache_tags::document_comments(document_id);
    let threads = state
        .cache
        .get_or_load(&tag, std::slice::from_ref(&tag), || async {
            let comments = CommentRepo::list_with_authors(&state.pool, document_id).await?;
            Ok::<_, sqlx::Error>(build_threads(comments))
        })
        .await?;
    Ok(Json(DataResponse { data: threads }))
}

/// POST /documents/{id}/comments
///
/// Post an annotation or a suggestion. Contributors only.
pub async fn create_comment(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(mut input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    let resolved = access::assert_contributor(&state.pool, document_id, auth.user_id()).await?;
    let author_id = auth.user_id().ok_or_else(|| {
        AppError::InternalError("contributor check passed without a viewer".into())
    })?;

    let kind = input
        .kind
        .take()
        .unwrap_or_else(|| COMMENT_KIND_ANNOTATION.to_string());
    validate_comment(&CommentDraft {
        kind: &kind,
        body: &input.body,
        suggested_text: input.suggested_text.as_deref(),
        anchor_start: input.anchor_start,
        anchor_end: input.anchor_end,
    })?;
    input.body = input.body.trim().to_string();

    if let Some(parent_id) = input.parent_id {
        if CommentRepo::find_on_document(&state.pool, document_id, parent_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::Validation(
                "Parent comment must belong to the same document".into(),
            )));
        }
    }

    let comment = CommentRepo::create(&state.pool, document_id, author_id, &kind, &input).await?;

    invalidate_document(
        &state,
        &resolved.document,
        resolved.document.visibility == VISIBILITY_PUBLIC,
        &[cache_tags::document_comments(document_id)],
    )
    .await?;

    tracing::info!(
        user_id = author_id,
        document_id,
        comment_id = comment.id,
        kind = %comment.kind,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// PUT /documents/{id}/comments/{comment_id}/status
///
/// Open or resolve an annotation. Contributors only; suggestions change
/// status through their decision.
pub async fn update_comment_status(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path((document_id, comment_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCommentStatus>,
) -> AppResult<impl IntoResponse> {
    let resolved = access::assert_contributor(&state.pool, document_id, auth.user_id()).await?;
    validate_comment_status(&input.status)?;

    let existing = CommentRepo::find_on_document(&state.pool, document_id, comment_id)
        .await?
        .ok_or_else(|| comment_not_found(comment_id))?;
    if let Err(err) = ensure_status_editable(&existing.kind) {
        tracing::warn!(document_id, comment_id, "Manual status change on a suggestion");
        return Err(err.into());
    }

    let comment = CommentRepo::update_status(&state.pool, document_id, comment_id, &input.status)
        .await?
        .ok_or_else(|| comment_not_found(comment_id))?;

    invalidate_document(
        &state,
        &resolved.document,
        resolved.document.visibility == VISIBILITY_PUBLIC,
        &[cache_tags::document_comments(document_id)],
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id(),
        document_id,
        comment_id,
        status = %comment.status,
        "Comment status updated"
    );

    Ok(Json(DataResponse { data: comment }))
}

/// POST /documents/{id}/comments/{comment_id}/decision
///
/// Approve or reject a pending suggestion. Owner only.
///
/// Runs in one transaction with the document and comment rows locked, so
/// the pending check and the content splice see the same state and a
/// suggestion can be decided only once.
pub async fn decide_suggestion(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path((document_id, comment_id)): Path<(DbId, DbId)>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<impl IntoResponse> {
    access::assert_owner(&state.pool, document_id, auth.user_id()).await?;

    let mut tx = state.pool.begin().await?;

    let document = DocumentRepo::find_for_update(&mut *tx, document_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id: document_id,
        }))?;
    let comment = CommentRepo::find_for_update(&mut *tx, document_id, comment_id)
        .await?
        .ok_or_else(|| comment_not_found(comment_id))?;

    let outcome = suggestion::ensure_pending(&comment.kind, comment.suggestion_status.as_deref())
        .and_then(|()| match input.decision {
            Decision::Reject => Ok(None),
            Decision::Approve => suggestion::apply(
                &document.content,
                SuggestionAnchor {
                    start: comment.anchor_start,
                    end: comment.anchor_end,
                    text: comment.anchor_text.as_deref(),
                },
                comment.suggested_text.as_deref().unwrap_or_default(),
                state.config.verify_anchor_text,
            )
            .map(Some),
        });

    let new_content = match outcome {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(
                user_id = auth.user_id(),
                document_id,
                comment_id,
                error = %err,
                "Suggestion decision refused"
            );
            return Err(AppError::Core(err.into()));
        }
    };

    let (document, suggestion_status) = match new_content {
        Some(content) => (
            DocumentRepo::set_content(&mut *tx, document_id, &content).await?,
            SUGGESTION_APPROVED,
        ),
        None => (document, SUGGESTION_REJECTED),
    };
    let comment =
        CommentRepo::set_suggestion_outcome(&mut *tx, comment_id, suggestion_status).await?;

    tx.commit().await?;

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
        comment_id,
        suggestion_status,
        "Suggestion decided"
    );

    Ok(Json(DataResponse {
        data: DecisionResponse { comment, document },
    }))
}
