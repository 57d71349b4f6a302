//! Route definitions for documents and everything scoped under one.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{comments, documents, invitations};
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /                                        -> list_documents (auth)
/// POST   /                                        -> create_document (auth)
/// GET    /public                                  -> list_public_documents
/// GET    /by-slug/{slug}                          -> get_document_by_slug
/// GET    /{id}                                    -> get_document
/// PUT    /{id}/content                            -> update_content (owner)
/// PUT    /{id}/metadata                           -> update_metadata (owner)
/// PUT    /{id}/visibility                         -> update_visibility (owner)
///
/// GET    /{id}/comments                           -> list_comments
/// POST   /{id}/comments                           -> create_comment (contributor)
/// PUT    /{id}/comments/{comment_id}/status       -> update_comment_status
/// POST   /{id}/comments/{comment_id}/decision     -> decide_suggestion (owner)
///
/// GET    /{id}/invitations                        -> list_invitations (owner)
/// POST   /{id}/invitations                        -> create_invitation (owner)
/// POST   /{id}/invitations/{invitation_id}/revoke -> revoke_invitation (owner)
/// DELETE /{id}/collaborators/{collaborator_id}    -> remove_collaborator (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(documents::list_documents).post(documents::create_document),
        )
        .route("/public", get(documents::list_public_documents))
        .route("/by-slug/{slug}", get(documents::get_document_by_slug))
        .route("/{id}", get(documents::get_document))
        .route("/{id}/content", put(documents::update_content))
        .route("/{id}/metadata", put(documents::update_metadata))
        .route("/{id}/visibility", put(documents::update_visibility))
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/{id}/comments/{comment_id}/status",
            put(comments::update_comment_status),
        )
        .route(
            "/{id}/comments/{comment_id}/decision",
            post(comments::decide_suggestion),
        )
        .route(
            "/{id}/invitations",
            get(invitations::list_invitations).post(invitations::create_invitation),
        )
        .route(
            "/{id}/invitations/{invitation_id}/revoke",
            post(invitations::revoke_invitation),
        )
        .route(
            "/{id}/collaborators/{collaborator_id}",
            delete(invitations::remove_collaborator),
        )
}
