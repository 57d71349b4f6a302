pub mod dashboard;
pub mod documents;
pub mod entries;
pub mod health;
pub mod invitations;
pub mod uploads;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dashboard                                       own + public documents, own entries
///
/// /documents                                       list (auth), create (auth)
/// /documents/public                                public listing
/// /documents/by-slug/{slug}                        resolve by slug
/// /documents/{id}                                  workspace detail
/// /documents/{id}/content|metadata|visibility      owner edits
/// /documents/{id}/comments                         list, create
/// /documents/{id}/comments/{cid}/status            open / resolve
/// /documents/{id}/comments/{cid}/decision          approve / reject suggestion
/// /documents/{id}/invitations                      list, invite (owner)
/// /documents/{id}/invitations/{iid}/revoke         revoke (owner)
/// /documents/{id}/collaborators/{cid}              remove (owner)
///
/// /invitations/{token}                             preview (public)
/// /invitations/{token}/accept                      accept (auth)
///
/// /entries                                         list, create (auth)
/// /entries/{id}                                    profile (public), delete (owner)
///
/// /uploads/entry-profile-image/authorize|complete  profile image upload
/// /uploads/entry-gallery-image/authorize|complete  gallery image upload
///
/// /user/settings                                   get, update (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dashboard", dashboard::router())
        .nest("/documents", documents::router())
        .nest("/invitations", invitations::router())
        .nest("/entries", entries::router())
        // Authorize needs a bearer token; completion is a signed provider callback.
        .nest("/uploads", uploads::router())
        .nest("/user", user::router())
}
