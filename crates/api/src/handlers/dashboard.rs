//! Dashboard handler: everything the signed-in home page shows in one call.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use keepsake_core::cache_tags;
use keepsake_db::models::document::DocumentSummary;
use keepsake_db::models::entry::Entry;
use keepsake_db::repositories::{DocumentRepo, EntryRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub documents: Vec<DocumentSummary>,
    pub public_documents: Vec<DocumentSummary>,
    pub entries: Vec<Entry>,
}

/// GET /dashboard
///
/// Reads through the same cache entries as the individual listings.
pub async fn get_dashboard(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let documents_tag = cache_tags::document_list(auth.user_id);
    let documents = state
        .cache
        .get_or_load(&documents_tag, std::slice::from_ref(&documents_tag), || {
            DocumentRepo::list_for_user(&state.pool, auth.user_id)
        })
        .await?;

    let public_tag = cache_tags::PUBLIC_DOCUMENTS.to_string();
    let public_documents = state
        .cache
        .get_or_load(&public_tag, std::slice::from_ref(&public_tag), || {
            DocumentRepo::list_public(&state.pool)
        })
        .await?;

    let entries_tag = cache_tags::entry_list(auth.user_id);
    let entries = state
        .cache
        .get_or_load(&entries_tag, std::slice::from_ref(&entries_tag), || {
            EntryRepo::list_for_owner(&state.pool, auth.user_id)
        })
        .await?;

    Ok(Json(DataResponse {
        data: Dashboard {
            documents,
            public_documents,
            entries,
        },
    }))
}
