//! Upload route handlers.
//!
//! The hosting provider stores the bytes. `authorize` endpoints tell the
//! client what it may upload; `complete` endpoints are the provider's signed
//! callbacks once the file is stored.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use keepsake_core::cache_tags;
use keepsake_core::error::CoreError;
use keepsake_core::types::DbId;
use keepsake_core::uploads::{
    ensure_gallery_capacity, ensure_image_size, verify_callback, MAX_GALLERY_UPLOADS,
    MAX_IMAGE_BYTES, ROUTE_ENTRY_GALLERY_IMAGE, ROUTE_ENTRY_PROFILE_IMAGE, SIGNATURE_HEADER,
};
use keepsake_db::models::upload::CreateUpload;
use keepsake_db::repositories::{EntryRepo, UploadRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Payloads
   -------------------------------------------------------------------------- */

/// Metadata attached at authorization time and echoed back by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub user_id: DbId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<DbId>,
}

/// Constraints and metadata for an authorized upload.
#[derive(Debug, Serialize)]
pub struct UploadAuthorization {
    pub route: &'static str,
    pub max_file_size: i64,
    pub max_file_count: i64,
    pub metadata: UploadMetadata,
}

/// Request body for authorizing a gallery upload.
#[derive(Debug, Deserialize)]
pub struct GalleryAuthorizeRequest {
    pub entry_id: DbId,
}

/// The stored file as reported by the provider.
#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub key: String,
    pub size: i64,
}

/// Provider completion callback body.
#[derive(Debug, Deserialize)]
pub struct UploadCallback {
    pub metadata: UploadMetadata,
    pub file: UploadedFile,
}

/// Response to a completed profile image upload.
#[derive(Debug, Serialize)]
pub struct ProfileUploadComplete {
    pub uploaded_by: DbId,
    pub url: String,
    pub key: String,
}

/// Response to a completed gallery upload.
#[derive(Debug, Serialize)]
pub struct GalleryUploadComplete {
    pub id: DbId,
    pub url: String,
}

/// Verify the callback signature and parse the body.
fn read_callback(state: &AppState, headers: &HeaderMap, body: &Bytes) -> AppResult<UploadCallback> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !verify_callback(&state.config.upload_callback_secret, body, signature) {
        tracing::warn!("Upload callback with invalid signature");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid upload signature".into(),
        )));
    }

    let callback: UploadCallback = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid upload callback: {e}")))?;
    ensure_image_size(callback.file.size)?;
    Ok(callback)
}

/* --------------------------------------------------------------------------
   Entry profile image
   -------------------------------------------------------------------------- */

/// POST /uploads/entry-profile-image/authorize
pub async fn authorize_profile_image(auth: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: UploadAuthorization {
            route: ROUTE_ENTRY_PROFILE_IMAGE,
            max_file_size: MAX_IMAGE_BYTES,
            max_file_count: 1,
            metadata: UploadMetadata {
                user_id: auth.user_id,
                entry_id: None,
            },
        },
    }))
}

/// POST /uploads/entry-profile-image/complete
///
/// Nothing is recorded yet; the entry form submits the url and key when the
/// entry is created.
pub async fn complete_profile_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let callback = read_callback(&state, &headers, &body)?;

    tracing::info!(
        user_id = callback.metadata.user_id,
        key = %callback.file.key,
        "Profile image uploaded"
    );

    Ok(Json(DataResponse {
        data: ProfileUploadComplete {
            uploaded_by: callback.metadata.user_id,
            url: callback.file.url,
            key: callback.file.key,
        },
    }))
}

/* --------------------------------------------------------------------------
   Entry gallery images
   -------------------------------------------------------------------------- */

/// Confirm ownership and a free gallery slot, returning the current count.
///
/// The entry row stays locked for the rest of `conn`'s transaction.
async fn check_gallery_slot(
    conn: &mut PgConnection,
    entry_id: DbId,
    user_id: DbId,
) -> AppResult<i64> {
    EntryRepo::find_owned_for_update(&mut *conn, entry_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Entry",
            id: entry_id,
        }))?;
    let count = UploadRepo::count_for_entry(&mut *conn, entry_id).await?;
    if let Err(err) = ensure_gallery_capacity(count) {
        tracing::warn!(user_id, entry_id, count, "Gallery limit reached");
        return Err(err.into());
    }
    Ok(count)
}

/// POST /uploads/entry-gallery-image/authorize
pub async fn authorize_gallery_image(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GalleryAuthorizeRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;
    let count = check_gallery_slot(&mut *conn, input.entry_id, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: UploadAuthorization {
            route: ROUTE_ENTRY_GALLERY_IMAGE,
            max_file_size: MAX_IMAGE_BYTES,
            max_file_count: MAX_GALLERY_UPLOADS - count,
            metadata: UploadMetadata {
                user_id: auth.user_id,
                entry_id: Some(input.entry_id),
            },
        },
    }))
}

/// POST /uploads/entry-gallery-image/complete
///
/// Ownership and the gallery limit are checked again since the entry may
/// have changed between authorization and completion. The check and the
/// insert share one transaction holding the entry lock, so concurrent
/// callbacks cannot both take the last slot.
pub async fn complete_gallery_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let callback = read_callback(&state, &headers, &body)?;
    let user_id = callback.metadata.user_id;
    let entry_id = callback
        .metadata
        .entry_id
        .ok_or_else(|| AppError::BadRequest("Missing entry_id in upload metadata".into()))?;

    let mut tx = state.pool.begin().await?;
    check_gallery_slot(&mut *tx, entry_id, user_id).await?;
    let upload = UploadRepo::create(
        &mut *tx,
        &CreateUpload {
            user_id,
            entry_id,
            url: callback.file.url,
            key: callback.file.key,
            is_primary: false,
        },
    )
    .await?;
    EntryRepo::touch(&mut *tx, entry_id).await?;
    tx.commit().await?;

    state
        .cache
        .invalidate_tags(&[
            cache_tags::entry_detail(entry_id),
            cache_tags::entry_list(user_id),
        ])
        .await;

    tracing::info!(user_id, entry_id, upload_id = upload.id, "Gallery image uploaded");

    Ok(Json(DataResponse {
        data: GalleryUploadComplete {
            id: upload.id,
            url: upload.url,
        },
    }))
}
