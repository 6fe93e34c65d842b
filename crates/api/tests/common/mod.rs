#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use workwear_api::auth::jwt::{generate_access_token, JwtConfig};
use workwear_api::config::ServerConfig;
use workwear_api::protocols::storage::ProtocolConfig;
use workwear_api::router::build_app_router;
use workwear_api::state::AppState;
use workwear_core::inventory::ItemCategory;
use workwear_core::types::DbId;
use workwear_db::models::clothing_item::{ClothingItem, CreateClothingItem};
use workwear_db::models::clothing_type::{ClothingType, CreateClothingType};
use workwear_db::models::employee::{CreateEmployee, Employee};
use workwear_db::repositories::{ClothingItemRepo, ClothingTypeRepo, EmployeeRepo};
use workwear_events::{EmailError, EmailMessage, Mailer};

pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use-in-production";

/// Build a test `ServerConfig` with safe defaults.
///
/// Protocol documents are cached in a fresh directory under the system temp
/// dir so parallel tests never share files.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        email_mode: workwear_events::EmailMode::Production,
        smtp: None,
        protocols: ProtocolConfig {
            storage_dir: std::env::temp_dir()
                .join(format!("workwear-protocols-{}", uuid::Uuid::new_v4())),
        },
    }
}

// ---------------------------------------------------------------------------
// Mailer double
// ---------------------------------------------------------------------------

/// Records every message instead of sending it. With `fail` set, every send
/// returns a transport error.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, EmailMessage)>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, EmailMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, message: &EmailMessage) -> Result<Option<String>, EmailError> {
        if self.fail {
            return Err(EmailError::Build("relay unreachable".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), message.clone()));
        Ok(Some(format!("<{}@test>", uuid::Uuid::new_v4())))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Shared state wired against a recording mailer.
pub fn test_state(pool: PgPool, mailer: Arc<RecordingMailer>) -> AppState {
    AppState::new(pool, test_config(), mailer)
}

/// Build the full application router, using the same middleware stack as
/// production.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_mailer(pool, Arc::new(RecordingMailer::default()))
}

pub fn build_test_app_with_mailer(pool: PgPool, mailer: Arc<RecordingMailer>) -> Router {
    let state = test_state(pool, mailer);
    let config = test_config();
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub async fn seed_employee(pool: &PgPool, first: &str, last: &str, role: &str) -> Employee {
    EmployeeRepo::create(
        pool,
        &CreateEmployee {
            entra_id: None,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
            role: Some(role.to_string()),
            status: None,
        },
    )
    .await
    .expect("employee creation should succeed")
}

pub async fn seed_type(pool: &PgPool, name: &str) -> ClothingType {
    ClothingTypeRepo::create(
        pool,
        &CreateClothingType {
            name: name.to_string(),
            description: None,
            image_url: None,
        },
    )
    .await
    .expect("clothing type creation should succeed")
}

pub async fn seed_item(pool: &PgPool, clothing_type_id: DbId, size: &str) -> ClothingItem {
    let mut conn = pool.acquire().await.unwrap();
    ClothingItemRepo::create(
        &mut *conn,
        &CreateClothingItem {
            clothing_type_id,
            size: size.to_string(),
            category: ItemCategory::Pool,
            condition: None,
            personalized_for_id: None,
        },
    )
    .await
    .expect("item creation should succeed")
}

/// Overwrite the generated internal id so assertions can name the item.
pub async fn set_internal_id(pool: &PgPool, item_id: DbId, internal_id: &str) {
    sqlx::query("UPDATE clothing_items SET internal_id = $2 WHERE id = $1")
        .bind(item_id)
        .bind(internal_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn item_row(pool: &PgPool, id: DbId) -> ClothingItem {
    ClothingItemRepo::find_by_id(pool, id)
        .await
        .unwrap()
        .expect("item should exist")
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub fn token_for(employee_id: DbId, role: &str) -> String {
    generate_access_token(employee_id, role, &test_config().jwt).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Send an unauthenticated GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(json)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(json)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
