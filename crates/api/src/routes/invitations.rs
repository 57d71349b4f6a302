//! Invitee-facing invitation routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::invitations;
use crate::state::AppState;

/// Routes mounted at `/invitations`.
///
/// ```text
/// GET    /{token}          -> preview_invitation (public)
/// POST   /{token}/accept   -> accept_invitation (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(invitations::preview_invitation))
        .route("/{token}/accept", post(invitations::accept_invitation))
}
