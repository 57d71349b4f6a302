//! Invitation flow over HTTP: issue, preview, accept, expire, revoke, and
//! collaborator removal.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, post_auth, post_json_auth, token_for};
use serde_json::json;
use sqlx::PgPool;

fn accept_uri(token: &str) -> String {
    format!("/api/v1/invitations/{token}/accept")
}

async fn invite(
    app: axum::Router,
    owner: &str,
    document_id: i64,
    email: &str,
) -> serde_json::Value {
    let response = post_json_auth(
        app,
        &format!("/api/v1/documents/{document_id}/invitations"),
        json!({ "email": email }),
        owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accept_grants_access_once(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let owner = token_for("owner");
    let document = common::create_document(app.clone(), &owner, "Family tree", "", "private").await;
    let id = document["id"].as_i64().unwrap();

    let invitation = invite(app.clone(), &owner, id, "  Guest@Example.com ").await;
    assert_eq!(invitation["email"], "guest@example.com");
    assert_eq!(invitation["status"], "pending");
    let token = invitation["token"].as_str().unwrap().to_string();

    let response = get(app.clone(), &format!("/api/v1/invitations/{token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let preview = body_json(response).await;
    assert_eq!(preview["data"]["document_title"], "Family tree");
    assert!(preview["data"].get("token").is_none());

    let guest = token_for("guest");
    let detail_uri = format!("/api/v1/documents/{id}");
    assert_eq!(
        get_auth(app.clone(), &detail_uri, &guest).await.status(),
        StatusCode::NOT_FOUND
    );

    let response = post_auth(app.clone(), &accept_uri(&token), &guest).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["invitation"]["status"], "accepted");
    assert_eq!(json["data"]["collaborator"]["status"], "active");

    let response = get_auth(app.clone(), &detail_uri, &guest).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["access"]["is_active_collaborator"], true);
    assert_eq!(json["data"]["access"]["can_comment"], true);

    // A second accept is refused and adds no collaborator.
    let response = post_auth(app.clone(), &accept_uri(&token), &guest).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "This invitation is no longer active");

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM document_collaborators WHERE document_id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);

    // The collaboration shows up in the guest's listing.
    let response = get_auth(app, "/api/v1/documents", &guest).await;
    let listed = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["collaborator"]["status"], "active");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_invitation_is_marked_and_refused(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let owner = token_for("owner");
    let document = common::create_document(app.clone(), &owner, "Old letters", "", "private").await;
    let id = document["id"].as_i64().unwrap();

    let invitation = invite(app.clone(), &owner, id, "late@example.com").await;
    let token = invitation["token"].as_str().unwrap().to_string();

    sqlx::query(
        "UPDATE document_invitations SET expires_at = NOW() - INTERVAL '1 day' WHERE token = $1",
    )
    .bind(&token)
    .execute(&pool)
    .await
    .unwrap();

    let late = token_for("late");
    let response = post_auth(app.clone(), &accept_uri(&token), &late).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "This invitation has expired");

    let status: String =
        sqlx::query_scalar("SELECT status FROM document_invitations WHERE token = $1")
            .bind(&token)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "expired");

    let response = get_auth(app, &format!("/api/v1/documents/{id}"), &late).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_existing_user_is_added_immediately(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let document =
        common::create_document(app.clone(), &owner, "Shared album", "", "private").await;
    let id = document["id"].as_i64().unwrap();

    common::add_collaborator(app.clone(), &owner, id, "friend").await;

    let friend = token_for("friend");
    let response = get_auth(app.clone(), &format!("/api/v1/documents/{id}"), &friend).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Owners see collaborators and invitations; collaborators see no invitations.
    let json = body_json(response).await;
    assert!(json["data"]["invitations"].as_array().unwrap().is_empty());
    let response = get_auth(app, &format!("/api/v1/documents/{id}"), &owner).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["collaborators"][0]["user_name"], "friend");
    assert_eq!(json["data"]["invitations"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_cannot_invite_self(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let document = common::create_document(app.clone(), &owner, "Mine", "", "private").await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/documents/{}/invitations", document["id"]),
        json!({ "email": "owner@example.com" }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revoked_invitation_cannot_be_accepted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let document = common::create_document(app.clone(), &owner, "Drafts", "", "private").await;
    let id = document["id"].as_i64().unwrap();

    let invitation = invite(app.clone(), &owner, id, "maybe@example.com").await;
    let invitation_id = invitation["id"].as_i64().unwrap();
    let token = invitation["token"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/documents/{id}/invitations/{invitation_id}/revoke");
    let response = post_auth(app.clone(), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "revoked");

    // Revoking again is a no-op success.
    let response = post_auth(app.clone(), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);

    let invitations_uri = format!("/api/v1/documents/{id}/invitations");
    let response = get_auth(app.clone(), &invitations_uri, &owner).await;
    let listed = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(listed[0]["status"], "revoked");

    let maybe = token_for("maybe");
    let response = post_auth(app, &accept_uri(&token), &maybe).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removed_collaborator_loses_access(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let document = common::create_document(app.clone(), &owner, "Memoir", "", "private").await;
    let id = document["id"].as_i64().unwrap();
    common::add_collaborator(app.clone(), &owner, id, "helper").await;
    let helper = token_for("helper");

    // Warm the helper's listing.
    let response = get_auth(app.clone(), "/api/v1/documents", &helper).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app.clone(), &format!("/api/v1/documents/{id}"), &owner).await;
    let collaborator_id = body_json(response).await["data"]["collaborators"][0]["id"]
        .as_i64()
        .unwrap();

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/documents/{id}/collaborators/{collaborator_id}"),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &format!("/api/v1/documents/{id}"), &helper).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get_auth(app, "/api/v1/documents", &helper).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_token_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/invitations/not-a-real-token").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invitation not found");
}
