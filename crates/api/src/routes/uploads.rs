//! Upload routes. Paths are named after the provider's route slugs.
//!
//! `complete` endpoints carry no bearer token; they are authenticated by the
//! callback signature instead.

use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Routes mounted at `/uploads`.
///
/// ```text
/// POST /entry-profile-image/authorize   -> authorize_profile_image (auth)
/// POST /entry-profile-image/complete    -> complete_profile_image (signed)
/// POST /entry-gallery-image/authorize   -> authorize_gallery_image (auth)
/// POST /entry-gallery-image/complete    -> complete_gallery_image (signed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/entry-profile-image/authorize",
            post(uploads::authorize_profile_image),
        )
        .route(
            "/entry-profile-image/complete",
            post(uploads::complete_profile_image),
        )
        .route(
            "/entry-gallery-image/authorize",
            post(uploads::authorize_gallery_image),
        )
        .route(
            "/entry-gallery-image/complete",
            post(uploads::complete_gallery_image),
        )
}
