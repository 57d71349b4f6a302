//! Handlers for per-user settings.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use keepsake_core::settings::validate_theme;
use keepsake_db::models::settings::UpdateUserSettings;
use keepsake_db::repositories::UserSettingsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /user/settings
///
/// Creates the default row on first access.
pub async fn get_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let settings = UserSettingsRepo::get_or_create(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /user/settings
pub async fn update_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUserSettings>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref theme) = input.theme {
        validate_theme(theme)?;
    }

    let settings = UserSettingsRepo::upsert(&state.pool, auth.user_id, &input).await?;

    tracing::info!(user_id = auth.user_id, theme = %settings.theme, "User settings updated");

    Ok(Json(DataResponse { data: settings }))
}
