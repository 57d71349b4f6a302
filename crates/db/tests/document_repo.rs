//! Integration tests for documents, comments, and slug allocation.

use keepsake_core::slug::base_slug;
use keepsake_core::types::DbId;
use keepsake_db::models::comment::CreateComment;
use keepsake_db::models::document::{CreateDocument, Document};
use keepsake_db::models::user::{UpsertUser, User};
use keepsake_db::repositories::{CollaboratorRepo, CommentRepo, DocumentRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user(pool: &PgPool, sub: &str) -> User {
    UserRepo::upsert(
        pool,
        &UpsertUser {
            external_id: sub.to_string(),
            name: sub.to_string(),
            email: format!("{sub}@example.com"),
            image_url: None,
        },
    )
    .await
    .unwrap()
}

fn new_document(title: &str) -> CreateDocument {
    CreateDocument {
        title: title.to_string(),
        summary: None,
        visibility: None,
        content: Some("The quick fox".to_string()),
    }
}

async fn create_document(pool: &PgPool, owner_id: DbId, base: &str, title: &str) -> Document {
    DocumentRepo::create_with_unique_slug(pool, owner_id, base, &new_document(title))
        .await
        .unwrap()
        .unwrap()
}

fn annotation(body: &str) -> CreateComment {
    CreateComment {
        body: body.to_string(),
        kind: None,
        parent_id: None,
        anchor_start: None,
        anchor_end: None,
        anchor_text: None,
        anchor_meta: None,
        suggested_text: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_title_gets_numbered_slug(pool: PgPool) {
    let owner = user(&pool, "ada").await;
    let base = base_slug("Nebula Protocol", "untitled");

    let first = create_document(&pool, owner.id, &base, "Nebula Protocol").await;
    let second = create_document(&pool, owner.id, &base, "Nebula Protocol").await;

    assert_eq!(first.slug, "nebula-protocol");
    assert_eq!(second.slug, "nebula-protocol-2");
    assert_eq!(first.visibility, "private");
    assert_eq!(first.content, "The quick fox");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_slug(pool: PgPool) {
    let owner = user(&pool, "ada").await;
    let doc = create_document(&pool, owner.id, "field-notes", "Field notes").await;

    let found = DocumentRepo::find_by_slug(&pool, "field-notes").await.unwrap().unwrap();
    assert_eq!(found.id, doc.id);
    assert!(DocumentRepo::find_by_slug(&pool, "missing").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_content_summary_semantics(pool: PgPool) {
    let owner = user(&pool, "ada").await;
    let doc = create_document(&pool, owner.id, "notes", "Notes").await;

    let updated = DocumentRepo::update_content(&pool, doc.id, "v2", Some(Some("short")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.summary.as_deref(), Some("short"));

    let untouched = DocumentRepo::update_content(&pool, doc.id, "v3", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.content, "v3");
    assert_eq!(untouched.summary.as_deref(), Some("short"));

    let cleared = DocumentRepo::update_content(&pool, doc.id, "v4", Some(None))
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.summary.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_counts_and_collaborations(pool: PgPool) {
    let owner = user(&pool, "ada").await;
    let guest = user(&pool, "grace").await;
    let doc = create_document(&pool, owner.id, "shared", "Shared").await;

    CommentRepo::create(&pool, doc.id, owner.id, "annotation", &annotation("hello"))
        .await
        .unwrap();
    let suggestion = CreateComment {
        anchor_start: Some(4),
        anchor_end: Some(9),
        suggested_text: Some("slow".into()),
        ..annotation("tweak")
    };
    let created = CommentRepo::create(&pool, doc.id, owner.id, "suggestion", &suggestion)
        .await
        .unwrap();
    assert_eq!(created.suggestion_status.as_deref(), Some("pending"));

    // Guest sees nothing until they collaborate.
    assert!(DocumentRepo::list_for_user(&pool, guest.id).await.unwrap().is_empty());

    let mut conn = pool.acquire().await.unwrap();
    CollaboratorRepo::upsert_active(&mut *conn, doc.id, guest.id, owner.id)
        .await
        .unwrap();
    drop(conn);

    let listed = DocumentRepo::list_for_user(&pool, guest.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].comment_count, 2);
    assert_eq!(listed[0].pending_suggestions, 1);
    assert_eq!(listed[0].owner.id, owner.id);
    assert_eq!(listed[0].collaborator.as_ref().unwrap().status, "active");

    let own = DocumentRepo::list_for_user(&pool, owner.id).await.unwrap();
    assert_eq!(own.len(), 1);
    assert!(own[0].collaborator.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revoked_collaboration_hidden_from_listing(pool: PgPool) {
    let owner = user(&pool, "ada").await;
    let guest = user(&pool, "grace").await;
    let doc = create_document(&pool, owner.id, "shared", "Shared").await;

    let mut conn = pool.acquire().await.unwrap();
    CollaboratorRepo::upsert_active(&mut *conn, doc.id, guest.id, owner.id)
        .await
        .unwrap();
    drop(conn);
    sqlx::query("UPDATE document_collaborators SET status = 'revoked' WHERE document_id = $1")
        .bind(doc.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(DocumentRepo::list_for_user(&pool, guest.id).await.unwrap().is_empty());
    let detail = DocumentRepo::find_detail(&pool, doc.id).await.unwrap().unwrap();
    assert!(detail.collaborators.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_listing_only_public(pool: PgPool) {
    let owner = user(&pool, "ada").await;
    let private = create_document(&pool, owner.id, "a", "Private one").await;
    let public = create_document(&pool, owner.id, "b", "Public one").await;
    DocumentRepo::update_visibility(&pool, public.id, "public").await.unwrap();

    let listed = DocumentRepo::list_public(&pool).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![public.id]);
    assert!(!ids.contains(&private.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_suggestion_requires_anchor_fields(pool: PgPool) {
    let owner = user(&pool, "ada").await;
    let doc = create_document(&pool, owner.id, "x", "Xylophone").await;

    let bare = annotation("no anchor");
    let result = CommentRepo::create(&pool, doc.id, owner.id, "suggestion", &bare).await;
    let err = result.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("ck_document_comments_suggestion_fields"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_annotation_drops_suggested_text(pool: PgPool) {
    let owner = user(&pool, "ada").await;
    let doc = create_document(&pool, owner.id, "notes", "Notes").await;

    let stray = CreateComment {
        suggested_text: Some("slow".into()),
        ..annotation("just a note")
    };
    let created = CommentRepo::create(&pool, doc.id, owner.id, "annotation", &stray)
        .await
        .unwrap();

    assert_eq!(created.kind, "annotation");
    assert!(created.suggested_text.is_none());
    assert!(created.suggestion_status.is_none());
}
