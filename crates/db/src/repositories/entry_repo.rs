//! Repository for the `entries` table.

use keepsake_core::slug::{candidate, MAX_SLUG_ATTEMPTS};
use keepsake_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::entry::{CreateEntry, Entry, EntryDetail};
use crate::models::user::UserSummary;
use crate::repositories::UploadRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, slug, birth_date, death_date, cause_of_death, \
    location, primary_image_url, created_at, updated_at";

/// Provides CRUD operations for memorial entries.
pub struct EntryRepo;

impl EntryRepo {
    /// Insert an entry under the first free slug derived from `base`.
    ///
    /// Runs on the caller's transaction so the primary upload row can be
    /// written atomically with it. Returns `None` when every candidate up to
    /// [`MAX_SLUG_ATTEMPTS`] is taken.
    pub async fn create_with_unique_slug(
        conn: &mut PgConnection,
        owner_id: DbId,
        base: &str,
        input: &CreateEntry,
    ) -> Result<Option<Entry>, sqlx::Error> {
        let query = format!(
            "INSERT INTO entries
                (owner_id, name, slug, birth_date, death_date, cause_of_death, location,
                 primary_image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (slug) DO NOTHING
             RETURNING {COLUMNS}"
        );
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = candidate(base, attempt);
            let inserted = sqlx::query_as::<_, Entry>(&query)
                .bind(owner_id)
                .bind(&input.name)
                .bind(&slug)
                .bind(input.birth_date)
                .bind(input.death_date)
                .bind(&input.cause_of_death)
                .bind(&input.location)
                .bind(&input.primary_image_url)
                .fetch_optional(&mut *conn)
                .await?;
            if inserted.is_some() {
                return Ok(inserted);
            }
        }
        Ok(None)
    }

    /// Find an entry by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Entry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM entries WHERE id = $1");
        sqlx::query_as::<_, Entry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find and row-lock an entry only if `owner_id` owns it.
    ///
    /// Inside a transaction this serializes gallery writes for the entry
    /// until commit.
    pub async fn find_owned_for_update(
        conn: &mut PgConnection,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Entry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM entries WHERE id = $1 AND owner_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Entry>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Entries owned by a user, most recently updated first.
    pub async fn list_for_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Entry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM entries WHERE owner_id = $1 ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Entry>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Entry profile with owner summary and uploads.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<EntryDetail>, sqlx::Error> {
        let Some(entry) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let owner = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, image_url FROM users WHERE id = $1",
        )
        .bind(entry.owner_id)
        .fetch_one(pool)
        .await?;
        let uploads = UploadRepo::list_for_entry(pool, id).await?;
        Ok(Some(EntryDetail {
            entry,
            owner,
            uploads,
        }))
    }

    /// Bump an entry's `updated_at`.
    pub async fn touch(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE entries SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Delete an owned entry. Returns `true` if a row was removed.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
