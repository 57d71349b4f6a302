//! Handlers for document invitations and collaborator management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use keepsake_core::cache_tags;
use keepsake_core::error::CoreError;
use keepsake_core::invitation::{self, InvitationError};
use keepsake_core::types::DbId;
use keepsake_db::models::collaborator::Collaborator;
use keepsake_db::models::invitation::{CreateInvitation, Invitation};
use keepsake_db::repositories::{CollaboratorRepo, DocumentRepo, InvitationRepo, UserRepo};

use crate::access;
use crate::error::{AppError, AppResult};
use crate::handlers::documents::invalidate_document;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of accepting an invitation.
#[derive(Debug, Serialize)]
pub struct AcceptedInvitation {
    pub invitation: Invitation,
    pub collaborator: Collaborator,
}

fn invitation_not_found() -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Invitation",
        key: "token".into(),
    })
}

/* --------------------------------------------------------------------------
   Owner endpoints
   -------------------------------------------------------------------------- */

/// GET /documents/{id}/invitations
pub async fn list_invitations(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    access::assert_owner(&state.pool, document_id, auth.user_id()).await?;

    let tag = cache_tags::document_invites(document_id);
    let invitations = state
        .cache
        .get_or_load(&tag, std::slice::from_ref(&tag), || {
            InvitationRepo::list_for_document(&state.pool, document_id)
        })
        .await?;
    Ok(Json(DataResponse { data: invitations }))
}

/// POST /documents/{id}/invitations
///
/// Invite an email address. Re-inviting refreshes the token and expiry. If
/// an account with that email already exists it becomes an active
/// collaborator straight away.
pub async fn create_invitation(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(input): Json<CreateInvitation>,
) -> AppResult<impl IntoResponse> {
    let document = access::assert_owner(&state.pool, document_id, auth.user_id()).await?;
    let email = invitation::normalize_email(&input.email)?;

    let existing_user = UserRepo::find_by_email(&state.pool, &email).await?;
    if existing_user.as_ref().is_some_and(|u| u.id == document.owner_id) {
        return Err(AppError::Core(CoreError::Validation(
            "You already own this document".into(),
        )));
    }

    let token = invitation::generate_token();
    let expires_at = invitation::expires_at(chrono::Utc::now());
    let created = InvitationRepo::upsert(
        &state.pool,
        document_id,
        &email,
        &token,
        document.owner_id,
        expires_at,
    )
    .await?;

    let mut extra = vec![cache_tags::document_invites(document_id)];
    if let Some(user) = existing_user {
        let mut conn = state.pool.acquire().await?;
        CollaboratorRepo::upsert_active(&mut *conn, document_id, user.id, document.owner_id)
            .await?;
        extra.push(cache_tags::document_list(user.id));
        tracing::info!(
            document_id,
            collaborator_user_id = user.id,
            "Existing user added as collaborator on invite"
        );
    }
    invalidate_document(&state, &document, false, &extra).await?;

    tracing::info!(
        user_id = auth.user_id(),
        document_id,
        invitation_id = created.id,
        "Invitation issued"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// POST /documents/{id}/invitations/{invitation_id}/revoke
///
/// Revoke a pending invitation. Revoking one that is no longer pending
/// succeeds without changing it.
pub async fn revoke_invitation(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path((document_id, invitation_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    access::assert_owner(&state.pool, document_id, auth.user_id()).await?;

    let revoked = InvitationRepo::revoke(&state.pool, document_id, invitation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invitation",
            id: invitation_id,
        }))?;

    state
        .cache
        .invalidate_tags(&[
            cache_tags::document_invites(document_id),
            cache_tags::document(document_id),
        ])
        .await;

    tracing::info!(
        user_id = auth.user_id(),
        document_id,
        invitation_id,
        status = %revoked.status,
        "Invitation revoked"
    );

    Ok(Json(DataResponse { data: revoked }))
}

/// DELETE /documents/{id}/collaborators/{collaborator_id}
pub async fn remove_collaborator(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Path((document_id, collaborator_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let document = access::assert_owner(&state.pool, document_id, auth.user_id()).await?;

    let collaborator = CollaboratorRepo::find_on_document(&state.pool, document_id, collaborator_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collaborator",
            id: collaborator_id,
        }))?;

    // Invalidate while the row still exists so the removed user's listing
    // is included among the collaborator lists.
    invalidate_document(
        &state,
        &document,
        false,
        &[
            cache_tags::document_invites(document_id),
            cache_tags::document_list(collaborator.user_id),
        ],
    )
    .await?;

    CollaboratorRepo::delete(&state.pool, document_id, collaborator_id).await?;

    tracing::info!(
        user_id = auth.user_id(),
        document_id,
        collaborator_id,
        removed_user_id = collaborator.user_id,
        "Collaborator removed"
    );

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
   Invitee endpoints
   -------------------------------------------------------------------------- */

/// GET /invitations/{token}
///
/// Public preview for the invite acceptance page.
pub async fn preview_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let preview = InvitationRepo::preview_by_token(&state.pool, &token)
        .await?
        .ok_or_else(invitation_not_found)?;
    Ok(Json(DataResponse { data: preview }))
}

/// POST /invitations/{token}/accept
///
/// Accept a pending invitation as the signed-in user. An expired invitation
/// is marked `expired` and refused.
pub async fn accept_invitation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;

    let pending = InvitationRepo::find_by_token_for_update(&mut *tx, &token)
        .await?
        .ok_or_else(invitation_not_found)?;

    match invitation::check_acceptable(&pending.status, pending.expires_at, chrono::Utc::now()) {
        Ok(()) => {}
        Err(InvitationError::Expired) => {
            tx.rollback().await?;
            InvitationRepo::mark_expired(&state.pool, pending.id).await?;
            state
                .cache
                .invalidate_tag(&cache_tags::document_invites(pending.document_id))
                .await;
            tracing::warn!(
                user_id = auth.user_id,
                invitation_id = pending.id,
                "Expired invitation refused"
            );
            return Err(AppError::Core(InvitationError::Expired.into()));
        }
        Err(err) => {
            tracing::warn!(
                user_id = auth.user_id,
                invitation_id = pending.id,
                status = %pending.status,
                "Inactive invitation refused"
            );
            return Err(AppError::Core(err.into()));
        }
    }

    let invitation = InvitationRepo::mark_accepted(&mut *tx, pending.id, auth.user_id).await?;
    let collaborator = CollaboratorRepo::upsert_active(
        &mut *tx,
        invitation.document_id,
        auth.user_id,
        invitation.inviter_id,
    )
    .await?;

    tx.commit().await?;

    if let Some(document) = DocumentRepo::find_by_id(&state.pool, invitation.document_id).await? {
        invalidate_document(
            &state,
            &document,
            false,
            &[cache_tags::document_invites(document.id)],
        )
        .await?;
    }

    tracing::info!(
        user_id = auth.user_id,
        document_id = invitation.document_id,
        invitation_id = invitation.id,
        "Invitation accepted"
    );

    Ok(Json(DataResponse {
        data: AcceptedInvitation {
            invitation,
            collaborator,
        },
    }))
}
