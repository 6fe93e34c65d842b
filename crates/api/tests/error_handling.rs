//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use workwear_api::error::AppError;
use workwear_core::error::CoreError;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, json) = error_to_response(AppError::Core(CoreError::NotFound {
        entity: "ClothingItem",
        id: 42,
    }))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "ClothingItem with id 42 not found");
}

#[tokio::test]
async fn unknown_token_returns_404() {
    let (status, json) = error_to_response(AppError::Core(CoreError::UnknownToken)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn invalid_state_returns_409() {
    let (status, json) = error_to_response(AppError::Core(CoreError::InvalidState(
        "The following items are not available: CLO-AAA111 (PENDING)".into(),
    )))
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_STATE");
    assert_eq!(
        json["error"],
        "The following items are not available: CLO-AAA111 (PENDING)"
    );
}

#[tokio::test]
async fn already_returned_returns_409() {
    let (status, json) = error_to_response(AppError::Core(CoreError::AlreadyReturned(
        "The following items have already been returned: CLO-AAA111".into(),
    )))
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_RETURNED");
}

#[tokio::test]
async fn confirmation_required_names_the_employee() {
    let (status, json) = error_to_response(AppError::Core(CoreError::ConfirmationRequired {
        employee: "Erika Muster <erika.muster@example.com>".into(),
    }))
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "CONFIRMATION_REQUIRED");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Erika Muster <erika.muster@example.com>"));
}

#[tokio::test]
async fn expired_returns_410() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Expired("link expired".into()))).await;

    assert_eq!(status, StatusCode::GONE);
    assert_eq!(json["code"], "EXPIRED");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let (status, json) = error_to_response(AppError::Core(CoreError::Validation(
        "At least one item id is required".into(),
    )))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn internal_error_hides_details() {
    let (status, json) = error_to_response(AppError::Core(CoreError::Internal(
        "snapshot decode failed at byte 17".into(),
    )))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("byte 17"));
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
