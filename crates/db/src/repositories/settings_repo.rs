//! Repository for the `user_settings` table.

use keepsake_core::types::DbId;
use sqlx::PgPool;

use crate::models::settings::{UpdateUserSettings, UserSettings};

const COLUMNS: &str = "user_id, theme, notifications, cookies, created_at, updated_at";

/// Provides read and upsert operations for per-user settings.
pub struct UserSettingsRepo;

impl UserSettingsRepo {
    /// Fetch a user's settings, creating the default row on first access.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<UserSettings, sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_settings (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM user_settings WHERE user_id = $1");
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Apply the non-`None` fields of `input`, creating the row if needed.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateUserSettings,
    ) -> Result<UserSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_settings (user_id, theme, notifications, cookies)
             VALUES ($1, COALESCE($2, 'system'), COALESCE($3, TRUE), COALESCE($4, FALSE))
             ON CONFLICT (user_id) DO UPDATE SET
                theme = COALESCE($2, user_settings.theme),
                notifications = COALESCE($3, user_settings.notifications),
                cookies = COALESCE($4, user_settings.cookies)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .bind(&input.theme)
            .bind(input.notifications)
            .bind(input.cookies)
            .fetch_one(pool)
            .await
    }
}
