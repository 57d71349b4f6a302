//! Repository for the `documents` table and its listing/detail views.

use keepsake_core::slug::{candidate, MAX_SLUG_ATTEMPTS};
use keepsake_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::document::{
    CreateDocument, Document, DocumentDetail, DocumentSummary, DocumentSummaryRow,
};
use crate::models::user::UserSummary;
use crate::repositories::{CollaboratorRepo, InvitationRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, slug, content, summary, visibility, \
    is_archived, created_at, updated_at";

/// Select list for [`DocumentSummaryRow`]. Expects aliases `d` (documents),
/// `u` (owner), `dc` (comments); collaborator columns are appended per query.
const SUMMARY_COLUMNS: &str = "d.id, d.title, d.slug, d.summary, d.visibility, d.updated_at, \
    d.owner_id, u.name AS owner_name, u.email AS owner_email, u.image_url AS owner_image_url, \
    COUNT(DISTINCT dc.id) AS comment_count, \
    COUNT(DISTINCT dc.id) FILTER (
        WHERE dc.kind = 'suggestion' AND dc.suggestion_status = 'pending'
    ) AS pending_suggestions";

/// Provides CRUD and listing operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a document under the first free slug derived from `base`
    /// (`base`, `base-2`, `base-3`, ...).
    ///
    /// The slug unique constraint decides: a conflicting insert is skipped
    /// and the next candidate tried, so concurrent creations cannot collide.
    /// Returns `None` if [`MAX_SLUG_ATTEMPTS`] candidates are all taken.
    pub async fn create_with_unique_slug(
        pool: &PgPool,
        owner_id: DbId,
        base: &str,
        input: &CreateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (owner_id, title, slug, summary, visibility, content)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'private'), COALESCE($6, ''))
             ON CONFLICT (slug) DO NOTHING
             RETURNING {COLUMNS}"
        );
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = candidate(base, attempt);
            let inserted = sqlx::query_as::<_, Document>(&query)
                .bind(owner_id)
                .bind(&input.title)
                .bind(&slug)
                .bind(&input.summary)
                .bind(&input.visibility)
                .bind(&input.content)
                .fetch_optional(pool)
                .await?;
            if inserted.is_some() {
                return Ok(inserted);
            }
            tracing::debug!(slug = %slug, "Document slug taken, trying next candidate");
        }
        Ok(None)
    }

    /// Find a document by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a document by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE slug = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Load and row-lock a document inside a transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Replace a document's content inside a transaction.
    pub async fn set_content(
        conn: &mut PgConnection,
        id: DbId,
        content: &str,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET content = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(content)
            .fetch_one(&mut *conn)
            .await
    }

    /// Replace a document's content. When `summary` is `Some`, the summary
    /// is replaced too (`Some(None)` clears it).
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
        summary: Option<Option<&str>>,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET
                content = $2,
                summary = CASE WHEN $3 THEN $4 ELSE summary END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(content)
            .bind(summary.is_some())
            .bind(summary.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Update a document's title and summary.
    pub async fn update_metadata(
        pool: &PgPool,
        id: DbId,
        title: &str,
        summary: Option<&str>,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET title = $2, summary = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(title)
            .bind(summary)
            .fetch_optional(pool)
            .await
    }

    /// Set a document's visibility.
    pub async fn update_visibility(
        pool: &PgPool,
        id: DbId,
        visibility: &str,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET visibility = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(visibility)
            .fetch_optional(pool)
            .await
    }

    /// Documents the user owns or collaborates on (revoked collaborations
    /// excluded), most recently updated first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DocumentSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS},
                    c.id AS collaborator_id,
                    c.status AS collaborator_status,
                    c.role AS collaborator_role
             FROM documents d
             INNER JOIN users u ON u.id = d.owner_id
             LEFT JOIN document_collaborators c
                ON c.document_id = d.id AND c.user_id = $1
             LEFT JOIN document_comments dc ON dc.document_id = d.id
             WHERE d.owner_id = $1 OR (c.user_id = $1 AND c.status <> 'revoked')
             GROUP BY d.id, u.id, c.id
             ORDER BY d.updated_at DESC"
        );
        let rows = sqlx::query_as::<_, DocumentSummaryRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(DocumentSummary::from).collect())
    }

    /// All public documents, most recently updated first.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<DocumentSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS},
                    NULL::BIGINT AS collaborator_id,
                    NULL::TEXT AS collaborator_status,
                    NULL::TEXT AS collaborator_role
             FROM documents d
             INNER JOIN users u ON u.id = d.owner_id
             LEFT JOIN document_comments dc ON dc.document_id = d.id
             WHERE d.visibility = 'public'
             GROUP BY d.id, u.id
             ORDER BY d.updated_at DESC"
        );
        let rows = sqlx::query_as::<_, DocumentSummaryRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(DocumentSummary::from).collect())
    }

    /// Workspace view: document, owner, non-revoked collaborators (oldest
    /// first) and non-revoked invitations (newest first).
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DocumentDetail>, sqlx::Error> {
        let Some(document) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let owner = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, image_url FROM users WHERE id = $1",
        )
        .bind(document.owner_id)
        .fetch_one(pool)
        .await?;

        let collaborators = CollaboratorRepo::list_visible_for_document(pool, id).await?;
        let invitations = InvitationRepo::list_visible_for_document(pool, id).await?;

        Ok(Some(DocumentDetail {
            document,
            owner,
            collaborators,
            invitations,
        }))
    }
}
