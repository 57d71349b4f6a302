//! Repository for the `user_uploads` table.

use keepsake_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::upload::{CreateUpload, Upload};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, entry_id, url, key, is_primary, created_at, updated_at";

/// Provides operations on entry uploads.
pub struct UploadRepo;

impl UploadRepo {
    /// Record a completed upload inside a transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateUpload,
    ) -> Result<Upload, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_uploads (user_id, entry_id, url, key, is_primary)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Upload>(&query)
            .bind(input.user_id)
            .bind(input.entry_id)
            .bind(&input.url)
            .bind(&input.key)
            .bind(input.is_primary)
            .fetch_one(&mut *conn)
            .await
    }

    /// Number of uploads attached to an entry.
    pub async fn count_for_entry(
        conn: &mut PgConnection,
        entry_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_uploads WHERE entry_id = $1")
            .bind(entry_id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Uploads for an entry, primary first and then newest first.
    pub async fn list_for_entry(pool: &PgPool, entry_id: DbId) -> Result<Vec<Upload>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_uploads
             WHERE entry_id = $1
             ORDER BY is_primary DESC, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Upload>(&query)
            .bind(entry_id)
            .fetch_all(pool)
            .await
    }
}
