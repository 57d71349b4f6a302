//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::{UpsertUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, external_id, name, email, image_url, created_at, updated_at";

/// Provides lookup and identity-sync operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user keyed by `external_id`, or refresh the profile fields of
    /// the existing row. Returns the current row either way.
    pub async fn upsert(pool: &PgPool, input: &UpsertUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (external_id, name, email, image_url)
             VALUES ($1, $2, LOWER($3), $4)
             ON CONFLICT (external_id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                image_url = EXCLUDED.image_url
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.external_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a user by email (stored lowercase).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
