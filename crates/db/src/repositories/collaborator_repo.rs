//! Repository for the `document_collaborators` table.

use keepsake_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::collaborator::{Collaborator, CollaboratorWithUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, document_id, user_id, role, status, invited_by_id, \
    accepted_at, created_at, updated_at";

/// Provides membership queries for documents.
pub struct CollaboratorRepo;

impl CollaboratorRepo {
    /// Whether `user_id` is an active collaborator on `document_id`.
    pub async fn is_active(
        pool: &PgPool,
        document_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM document_collaborators
                WHERE document_id = $1 AND user_id = $2 AND status = 'active'
            )",
        )
        .bind(document_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Make `user_id` an active commenter on `document_id`.
    ///
    /// Idempotent on `(document_id, user_id)`: an existing row (including a
    /// revoked one) is reactivated rather than duplicated.
    pub async fn upsert_active(
        conn: &mut PgConnection,
        document_id: DbId,
        user_id: DbId,
        invited_by_id: DbId,
    ) -> Result<Collaborator, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_collaborators
                (document_id, user_id, role, status, invited_by_id, accepted_at)
             VALUES ($1, $2, 'commenter', 'active', $3, NOW())
             ON CONFLICT ON CONSTRAINT uq_document_collaborators_document_user DO UPDATE SET
                status = 'active',
                accepted_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(document_id)
            .bind(user_id)
            .bind(invited_by_id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Find a collaborator row scoped to its document.
    pub async fn find_on_document(
        pool: &PgPool,
        document_id: DbId,
        id: DbId,
    ) -> Result<Option<Collaborator>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_collaborators
             WHERE id = $1 AND document_id = $2"
        );
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(id)
            .bind(document_id)
            .fetch_optional(pool)
            .await
    }

    /// Non-revoked collaborators with user details, oldest first.
    pub async fn list_visible_for_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<CollaboratorWithUser>, sqlx::Error> {
        sqlx::query_as::<_, CollaboratorWithUser>(
            "SELECT c.id, c.document_id, c.user_id, c.role, c.status, c.accepted_at,
                    c.created_at, u.name AS user_name, u.email AS user_email,
                    u.image_url AS user_image_url
             FROM document_collaborators c
             INNER JOIN users u ON u.id = c.user_id
             WHERE c.document_id = $1 AND c.status <> 'revoked'
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(document_id)
        .fetch_all(pool)
        .await
    }

    /// User IDs of every active collaborator on a document.
    pub async fn list_active_user_ids(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM document_collaborators
             WHERE document_id = $1 AND status = 'active'",
        )
        .bind(document_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a collaborator row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, document_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM document_collaborators WHERE id = $1 AND document_id = $2",
        )
        .bind(id)
        .bind(document_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
