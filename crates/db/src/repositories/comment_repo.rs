//! Repository for the `document_comments` table.

use keepsake_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::comment::{Comment, CommentWithAuthor, CreateComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, document_id, author_id, parent_id, kind, status, \
    suggestion_status, body, suggested_text, anchor_start, anchor_end, anchor_text, \
    anchor_meta, created_at, updated_at";

/// Provides CRUD operations for document comments and suggestions.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment of the given `kind`. Suggestions start `pending`;
    /// replacement text is only kept on suggestions.
    pub async fn create(
        pool: &PgPool,
        document_id: DbId,
        author_id: DbId,
        kind: &str,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_comments
                (document_id, author_id, parent_id, kind, suggestion_status, body,
                 suggested_text, anchor_start, anchor_end, anchor_text, anchor_meta)
             VALUES ($1, $2, $3, $4,
                     CASE WHEN $4 = 'suggestion' THEN 'pending' END,
                     $5,
                     CASE WHEN $4 = 'suggestion' THEN $6 END,
                     $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(document_id)
            .bind(author_id)
            .bind(input.parent_id)
            .bind(kind)
            .bind(&input.body)
            .bind(&input.suggested_text)
            .bind(input.anchor_start)
            .bind(input.anchor_end)
            .bind(&input.anchor_text)
            .bind(&input.anchor_meta)
            .fetch_one(pool)
            .await
    }

    /// Find a comment scoped to its document.
    pub async fn find_on_document(
        pool: &PgPool,
        document_id: DbId,
        id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_comments WHERE id = $1 AND document_id = $2"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(document_id)
            .fetch_optional(pool)
            .await
    }

    /// Load and row-lock a comment scoped to its document inside a transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        document_id: DbId,
        id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_comments
             WHERE id = $1 AND document_id = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(document_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Record a suggestion's terminal outcome and resolve the comment.
    pub async fn set_suggestion_outcome(
        conn: &mut PgConnection,
        id: DbId,
        suggestion_status: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "UPDATE document_comments SET suggestion_status = $2, status = 'resolved'
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(suggestion_status)
            .fetch_one(&mut *conn)
            .await
    }

    /// Open or resolve a comment.
    pub async fn update_status(
        pool: &PgPool,
        document_id: DbId,
        id: DbId,
        status: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE document_comments SET status = $3
             WHERE id = $1 AND document_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(document_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Every comment on a document with author details, oldest first.
    pub async fn list_with_authors(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.document_id, c.author_id, c.parent_id, c.kind, c.status,
                    c.suggestion_status, c.body, c.suggested_text, c.anchor_start,
                    c.anchor_end, c.anchor_text, c.anchor_meta, c.created_at, c.updated_at,
                    u.name AS author_name, u.email AS author_email,
                    u.image_url AS author_image_url
             FROM document_comments c
             INNER JOIN users u ON u.id = c.author_id
             WHERE c.document_id = $1
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(document_id)
        .fetch_all(pool)
        .await
    }
}
