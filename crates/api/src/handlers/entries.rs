//! Handlers for memorial entries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use keepsake_core::cache_tags;
use keepsake_core::documents::normalize_optional;
use keepsake_core::entries::{validate_entry, EntryDraft, DEFAULT_ENTRY_SLUG};
use keepsake_core::error::CoreError;
use keepsake_core::slug::base_slug;
use keepsake_core::types::DbId;
use keepsake_db::models::entry::{CreateEntry, EntryDetail};
use keepsake_db::models::upload::CreateUpload;
use keepsake_db::repositories::{EntryRepo, UploadRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /entries
///
/// The caller's entries, most recently updated first.
pub async fn list_entries(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tag = cache_tags::entry_list(auth.user_id);
    let entries = state
        .cache
        .get_or_load(&tag, std::slice::from_ref(&tag), || {
            EntryRepo::list_for_owner(&state.pool, auth.user_id)
        })
        .await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /entries
///
/// Create an entry and record its already-uploaded profile image as the
/// primary upload, atomically.
pub async fn create_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEntry>,
) -> AppResult<impl IntoResponse> {
    let input = CreateEntry {
        name: input.name.trim().to_string(),
        cause_of_death: normalize_optional(input.cause_of_death),
        location: normalize_optional(input.location),
        primary_image_url: input.primary_image_url.trim().to_string(),
        primary_image_key: input.primary_image_key.trim().to_string(),
        ..input
    };
    validate_entry(&EntryDraft {
        name: &input.name,
        birth_date: input.birth_date,
        death_date: input.death_date,
        cause_of_death: input.cause_of_death.as_deref(),
        location: input.location.as_deref(),
        primary_image_url: &input.primary_image_url,
        primary_image_key: &input.primary_image_key,
    })?;

    let base = base_slug(&input.name, DEFAULT_ENTRY_SLUG);

    let mut tx = state.pool.begin().await?;
    let entry = EntryRepo::create_with_unique_slug(&mut *tx, auth.user_id, &base, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Could not allocate a unique slug for this entry".into(),
            ))
        })?;
    UploadRepo::create(
        &mut *tx,
        &CreateUpload {
            user_id: auth.user_id,
            entry_id: entry.id,
            url: input.primary_image_url.clone(),
            key: input.primary_image_key.clone(),
            is_primary: true,
        },
    )
    .await?;
    EntryRepo::touch(&mut *tx, entry.id).await?;
    tx.commit().await?;

    state
        .cache
        .invalidate_tags(&[
            cache_tags::entry_list(auth.user_id),
            cache_tags::entry_detail(entry.id),
        ])
        .await;

    tracing::info!(
        user_id = auth.user_id,
        entry_id = entry.id,
        slug = %entry.slug,
        "Entry created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /entries/{id}
///
/// Public entry profile with its uploads.
pub async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = cache_tags::entry_detail(entry_id);
    let detail: Option<EntryDetail> = state
        .cache
        .get_or_load(&tag, std::slice::from_ref(&tag), || {
            EntryRepo::find_detail(&state.pool, entry_id)
        })
        .await?;
    let detail = detail.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Entry",
        id: entry_id,
    }))?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /entries/{id}
///
/// Owner only; uploads cascade.
pub async fn delete_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !EntryRepo::delete_owned(&state.pool, entry_id, auth.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Entry",
            id: entry_id,
        }));
    }

    state
        .cache
        .invalidate_tags(&[
            cache_tags::entry_list(auth.user_id),
            cache_tags::entry_detail(entry_id),
        ])
        .await;

    tracing::info!(user_id = auth.user_id, entry_id, "Entry deleted");

    Ok(StatusCode::NO_CONTENT)
}
