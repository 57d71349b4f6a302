//! Repository for the `document_invitations` table.

use keepsake_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::invitation::{Invitation, InvitationPreview};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, document_id, email, token, inviter_id, status, expires_at, \
    accepted_by_id, created_at, updated_at";

/// Provides invitation issue, lookup, and state transitions.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Issue (or re-issue) an invitation for `email` on a document.
    ///
    /// Re-inviting the same address overwrites the token, inviter and expiry
    /// and puts the invitation back into `pending`.
    pub async fn upsert(
        pool: &PgPool,
        document_id: DbId,
        email: &str,
        token: &str,
        inviter_id: DbId,
        expires_at: Timestamp,
    ) -> Result<Invitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_invitations
                (document_id, email, token, inviter_id, status, expires_at)
             VALUES ($1, $2, $3, $4, 'pending', $5)
             ON CONFLICT ON CONSTRAINT uq_document_invitations_document_email DO UPDATE SET
                token = EXCLUDED.token,
                inviter_id = EXCLUDED.inviter_id,
                status = 'pending',
                expires_at = EXCLUDED.expires_at,
                accepted_by_id = NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(document_id)
            .bind(email)
            .bind(token)
            .bind(inviter_id)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Load and row-lock an invitation by token inside a transaction.
    pub async fn find_by_token_for_update(
        conn: &mut PgConnection,
        token: &str,
    ) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_invitations WHERE token = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(token)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Invitation joined with its document and owner for the invite page.
    pub async fn preview_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<InvitationPreview>, sqlx::Error> {
        sqlx::query_as::<_, InvitationPreview>(
            "SELECT i.id, i.email, i.status, i.expires_at,
                    d.id AS document_id, d.title AS document_title, d.slug AS document_slug,
                    u.id AS owner_id, u.name AS owner_name, u.email AS owner_email,
                    u.image_url AS owner_image_url
             FROM document_invitations i
             INNER JOIN documents d ON d.id = i.document_id
             INNER JOIN users u ON u.id = d.owner_id
             WHERE i.token = $1",
        )
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    /// Move an invitation to `expired`.
    pub async fn mark_expired(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE document_invitations SET status = 'expired' WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Move an invitation to `accepted` inside a transaction.
    pub async fn mark_accepted(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
    ) -> Result<Invitation, sqlx::Error> {
        let query = format!(
            "UPDATE document_invitations SET status = 'accepted', accepted_by_id = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Revoke a pending invitation on a document.
    ///
    /// Returns `None` when no invitation with that ID exists on the document.
    /// A non-pending invitation is returned unchanged.
    pub async fn revoke(
        pool: &PgPool,
        document_id: DbId,
        id: DbId,
    ) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!(
            "UPDATE document_invitations SET
                status = CASE WHEN status = 'pending' THEN 'revoked' ELSE status END
             WHERE id = $1 AND document_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(id)
            .bind(document_id)
            .fetch_optional(pool)
            .await
    }

    /// Non-revoked invitations on a document, newest first.
    pub async fn list_visible_for_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<Invitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_invitations
             WHERE document_id = $1 AND status <> 'revoked'
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Every invitation on a document, newest first.
    pub async fn list_for_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<Invitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_invitations
             WHERE document_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }
}
