//! HTTP-level integration tests for the confirmation flow.
//!
//! Covers minting on issue, the public confirm link (idempotent, expiring),
//! protocol gating until confirmation, resend, and recording of email
//! delivery failures.

mod common;

use std::sync::Arc;

use axum::http::{header, StatusCode};
use sqlx::PgPool;
use workwear_core::types::DbId;
use workwear_db::models::confirmation::Confirmation;
use workwear_db::models::employee::Employee;
use workwear_db::repositories::ConfirmationRepo;

use common::{
    body_json, body_text, build_test_app, build_test_app_with_mailer, get, get_auth,
    post_json_auth, seed_employee, seed_item, seed_type, set_internal_id, token_for,
    RecordingMailer,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Setup {
    admin: Employee,
    admin_token: String,
    holder: Employee,
    item_id: DbId,
}

async fn setup(pool: &PgPool) -> Setup {
    let admin = seed_employee(pool, "Anna", "Admin", "ADMIN").await;
    let holder = seed_employee(pool, "Erika", "Muster", "READ_ONLY").await;
    let clothing_type = seed_type(pool, "Softshell Jacket").await;
    let item = seed_item(pool, clothing_type.id, "L").await;
    set_internal_id(pool, item.id, "CLO-ABC123").await;
    Setup {
        admin_token: token_for(admin.id, "ADMIN"),
        admin,
        holder,
        item_id: item.id,
    }
}

/// Issue the setup item through the API and return the JSON `data` object.
async fn issue_item(app: axum::Router, s: &Setup) -> serde_json::Value {
    let response = post_json_auth(
        app,
        "/api/v1/transactions/issue",
        serde_json::json!({
            "employee_id": s.holder.id,
            "item_id": s.item_id,
            "condition_on_issue": "GOOD",
        }),
        &s.admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn confirmation(pool: &PgPool, id: i64) -> Confirmation {
    ConfirmationRepo::find_by_id(pool, id)
        .await
        .unwrap()
        .expect("confirmation should exist")
}

// ---------------------------------------------------------------------------
// Issue → confirm → protocol
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn issue_protocol_unlocks_after_confirmation(pool: PgPool) {
    let s = setup(&pool).await;
    let mailer = Arc::new(RecordingMailer::default());
    let app = build_test_app_with_mailer(pool.clone(), Arc::clone(&mailer));

    let data = issue_item(app.clone(), &s).await;
    let tx_id = data["transaction"]["id"].as_i64().unwrap();
    assert_eq!(data["transaction"]["item_internal_id"], "CLO-ABC123");
    assert_eq!(data["transaction"]["issued_by_id"], s.admin.id);
    assert_eq!(data["confirmation"]["protocol_type"], "SINGLE");
    assert_eq!(data["confirmation"]["email_sent"], true);

    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    let stored = confirmation(&pool, confirmation_id).await;
    assert_eq!(stored.employee_id, s.holder.id);
    assert!(stored.belongs_to(tx_id));
    assert!(stored.email_sent);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, s.holder.email);
    assert!(sent[0].1.text_body.contains(&stored.token));

    let uri = format!("/api/v1/transactions/{tx_id}/protocol/issue");
    let response = get_auth(app.clone(), &uri, &s.admin_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFIRMATION_REQUIRED");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Erika Muster <erika.muster@example.com>"));

    let response = get(app.clone(), &format!("/api/v1/public/confirm/{}", stored.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["already_confirmed"], false);
    assert_eq!(json["data"]["items"][0]["name"], "Softshell Jacket");
    assert!(confirmation(&pool, confirmation_id).await.confirmed);

    let response = get_auth(app, &uri, &s.admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let text = body_text(response).await;
    assert!(text.contains("CLO-ABC123"));
    assert!(text.contains("Erika Muster"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn snapshot_ignores_later_item_edits(pool: PgPool) {
    let s = setup(&pool).await;
    let app = build_test_app(pool.clone());
    let data = issue_item(app.clone(), &s).await;
    let tx_id = data["transaction"]["id"].as_i64().unwrap();
    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    let token = confirmation(&pool, confirmation_id).await.token;

    sqlx::query("UPDATE clothing_types SET name = 'Rain Jacket'")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE clothing_items SET size = 'XXL' WHERE id = $1")
        .bind(s.item_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = get(app.clone(), &format!("/api/v1/public/confirm/{token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Softshell Jacket");
    assert_eq!(items[0]["size"], "L");

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/transactions/{tx_id}/return"),
        serde_json::json!({ "condition_on_return": "WORN" }),
        &s.admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = confirmation(&pool, confirmation_id).await;
    assert!(stored.belongs_to(tx_id));
    assert_eq!(stored.snapshot().unwrap().items[0].name, "Softshell Jacket");

    let uri = format!("/api/v1/transactions/{tx_id}/protocol/issue");
    let response = get_auth(app, &uri, &s.admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unreadable_snapshot_does_not_unlock_issue_protocol(pool: PgPool) {
    let s = setup(&pool).await;
    let app = build_test_app(pool.clone());
    let data = issue_item(app.clone(), &s).await;
    let tx_id = data["transaction"]["id"].as_i64().unwrap();
    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    let token = confirmation(&pool, confirmation_id).await.token;

    let response = get(app.clone(), &format!("/api/v1/public/confirm/{token}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Still matches the containment query, but no longer decodes.
    sqlx::query(
        "UPDATE confirmations
         SET items_json = jsonb_build_object('transactionIds', jsonb_build_array($2::BIGINT))
         WHERE id = $1",
    )
    .bind(confirmation_id)
    .bind(tx_id)
    .execute(&pool)
    .await
    .unwrap();
    assert!(!confirmation(&pool, confirmation_id).await.belongs_to(tx_id));

    let uri = format!("/api/v1/transactions/{tx_id}/protocol/issue");
    let response = get_auth(app, &uri, &s.admin_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "CONFIRMATION_REQUIRED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn repeated_confirm_is_idempotent(pool: PgPool) {
    let s = setup(&pool).await;
    let app = build_test_app(pool.clone());
    let data = issue_item(app.clone(), &s).await;
    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    let token = confirmation(&pool, confirmation_id).await.token;
    let uri = format!("/api/v1/public/confirm/{token}");

    let first = body_json(get(app.clone(), &uri).await).await;
    let first_at = confirmation(&pool, confirmation_id).await.confirmed_at;

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;

    assert_eq!(first["data"]["already_confirmed"], false);
    assert_eq!(second["data"]["already_confirmed"], true);
    assert_eq!(
        confirmation(&pool, confirmation_id).await.confirmed_at,
        first_at
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_link_is_gone(pool: PgPool) {
    let s = setup(&pool).await;
    let app = build_test_app(pool.clone());
    let data = issue_item(app.clone(), &s).await;
    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    sqlx::query("UPDATE confirmations SET expires_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(confirmation_id)
        .execute(&pool)
        .await
        .unwrap();
    let token = confirmation(&pool, confirmation_id).await.token;

    let response = get(app, &format!("/api/v1/public/confirm/{token}")).await;

    assert_eq!(response.status(), StatusCode::GONE);
    assert_eq!(body_json(response).await["code"], "EXPIRED");
    assert!(!confirmation(&pool, confirmation_id).await.confirmed);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn confirmed_link_stays_valid_after_expiry(pool: PgPool) {
    let s = setup(&pool).await;
    let app = build_test_app(pool.clone());
    let data = issue_item(app.clone(), &s).await;
    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    let token = confirmation(&pool, confirmation_id).await.token;
    let uri = format!("/api/v1/public/confirm/{token}");
    assert_eq!(get(app.clone(), &uri).await.status(), StatusCode::OK);

    sqlx::query("UPDATE confirmations SET expires_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(confirmation_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["already_confirmed"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_and_malformed_tokens_are_not_found(pool: PgPool) {
    let app = build_test_app(pool);

    let unknown = "ab".repeat(32);
    let response = get(app.clone(), &format!("/api/v1/public/confirm/{unknown}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/api/v1/public/confirm/not-a-token").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Confirmation protocol and resend
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn confirmation_protocol_is_cached_on_confirm(pool: PgPool) {
    let s = setup(&pool).await;
    let app = build_test_app(pool.clone());
    let data = issue_item(app.clone(), &s).await;
    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    let uri = format!("/api/v1/confirmations/{confirmation_id}/protocol");

    let response = get_auth(app.clone(), &uri, &s.admin_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let token = confirmation(&pool, confirmation_id).await.token;
    get(app.clone(), &format!("/api/v1/public/confirm/{token}")).await;

    let path = confirmation(&pool, confirmation_id)
        .await
        .protocol_file_path
        .expect("protocol cached after confirm");
    assert!(path.ends_with(&format!("confirmation-{confirmation_id}.txt")));

    let response = get_auth(app, &uri, &s.admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(body_text(response).await.contains("CLO-ABC123"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn resend_sends_again_until_confirmed(pool: PgPool) {
    let s = setup(&pool).await;
    let mailer = Arc::new(RecordingMailer::default());
    let app = build_test_app_with_mailer(pool.clone(), Arc::clone(&mailer));
    let data = issue_item(app.clone(), &s).await;
    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    let uri = format!("/api/v1/confirmations/{confirmation_id}/resend");

    let response = post_json_auth(app.clone(), &uri, serde_json::json!({}), &s.admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email_sent"], true);
    assert_eq!(mailer.sent().len(), 2);

    let token = confirmation(&pool, confirmation_id).await.token;
    get(app.clone(), &format!("/api/v1/public/confirm/{token}")).await;

    let response = post_json_auth(app, &uri, serde_json::json!({}), &s.admin_token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(mailer.sent().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn email_failure_is_recorded_and_issue_succeeds(pool: PgPool) {
    let s = setup(&pool).await;
    let app = build_test_app_with_mailer(pool.clone(), Arc::new(RecordingMailer::failing()));

    let data = issue_item(app, &s).await;

    assert_eq!(data["transaction"]["item_internal_id"], "CLO-ABC123");
    assert_eq!(data["confirmation"]["email_sent"], false);
    assert!(data["confirmation"]["email_error"]
        .as_str()
        .unwrap()
        .contains("relay unreachable"));

    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    let stored = confirmation(&pool, confirmation_id).await;
    assert!(!stored.email_sent);
    assert!(stored.email_sent_at.is_none());
    assert!(stored
        .email_error
        .as_deref()
        .unwrap()
        .contains("relay unreachable"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bulk_issue_mints_one_bulk_confirmation(pool: PgPool) {
    let s = setup(&pool).await;
    let clothing_type = seed_type(&pool, "Work Trousers").await;
    let second = seed_item(&pool, clothing_type.id, "52").await;
    let app = build_test_app(pool.clone());

    let response = post_json_auth(
        app,
        "/api/v1/transactions/issue/bulk",
        serde_json::json!({
            "employee_id": s.holder.id,
            "item_ids": [s.item_id, second.id],
            "condition_on_issue": "NEW",
        }),
        &s.admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let data = body_json(response).await["data"].clone();

    assert_eq!(data["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(data["confirmation"]["protocol_type"], "BULK_ISSUE");
    let confirmation_id = data["confirmation"]["confirmation_id"].as_i64().unwrap();
    let stored = confirmation(&pool, confirmation_id).await;
    for row in data["transactions"].as_array().unwrap() {
        assert!(stored.belongs_to(row["id"].as_i64().unwrap()));
    }
    assert_eq!(stored.snapshot().unwrap().items.len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn confirmation_records_require_people_read(pool: PgPool) {
    let s = setup(&pool).await;
    let app = build_test_app(pool.clone());
    issue_item(app.clone(), &s).await;

    let reader = token_for(s.holder.id, "READ_ONLY");
    let response = get_auth(app.clone(), "/api/v1/confirmations", &reader).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let hr = seed_employee(&pool, "Hanna", "Personal", "HR").await;
    let uri = format!("/api/v1/confirmations?employee_id={}&confirmed=false", s.holder.id);
    let response = get_auth(app, &uri, &token_for(hr.id, "HR")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].get("token").is_none(), "token must never be serialized");
    assert_eq!(rows[0]["employee_id"], s.holder.id);
}
