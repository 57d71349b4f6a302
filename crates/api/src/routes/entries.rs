use axum::routing::get;
use axum::Router;

use crate::handlers::entries;
use crate::state::AppState;

/// Routes mounted at `/entries`.
///
/// ```text
/// GET    /        -> list_entries (auth)
/// POST   /        -> create_entry (auth)
/// GET    /{id}    -> get_entry (public)
/// DELETE /{id}    -> delete_entry (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(entries::list_entries).post(entries::create_entry))
        .route("/{id}", get(entries::get_entry).delete(entries::delete_entry))
}
