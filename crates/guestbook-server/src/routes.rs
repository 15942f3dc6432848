//! Handlers for the `/api/entries` resource.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use guestbook_store::{Entry, StoreError, DEFAULT_LIMIT};

use crate::server::AppState;

#[derive(Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<Entry>,
}

#[derive(Serialize)]
pub struct EntryResponse {
    pub entry: Entry,
}

/// Error response carrying the HTTP status the store error maps to:
/// validation failures are the client's fault, everything else is ours.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let status = if e.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %e, "store operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// GET /api/entries
pub async fn list_entries(
    State(state): State<AppState>,
) -> Result<Json<EntriesResponse>, ApiError> {
    let entries = state.entries.list_latest(DEFAULT_LIMIT)?;
    Ok(Json(EntriesResponse { entries }))
}

/// POST /api/entries
///
/// The body is taken raw and inspected as loose JSON: a non-JSON body, a
/// missing `text` field, and a non-string `text` all get the same 400 with
/// the JSON error shape, never an extractor rejection (which would answer
/// with 415 or a plain-text body).
pub async fn create_entry(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let text = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("text").and_then(|t| t.as_str()).map(str::to_owned))
        .ok_or_else(|| ApiError::bad_request("Text field is required and must be a string"))?;

    let entry = state.entries.create(&text)?;
    Ok((StatusCode::CREATED, Json(EntryResponse { entry })))
}

/// Any other method on /api/entries.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::server::tests::test_app;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_entries() -> Request<Body> {
        Request::builder()
            .uri("/api/entries")
            .body(Body::empty())
            .unwrap()
    }

    fn post_entry(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/entries")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn entry_count(app: &Router) -> usize {
        let resp = app.clone().oneshot(get_entries()).await.unwrap();
        body_json(resp).await["entries"].as_array().unwrap().len()
    }

    #[tokio::test]
    async fn get_empty_store() {
        let app = test_app();
        let resp = app.oneshot(get_entries()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["entries"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn post_then_get_round_trip() {
        let app = test_app();

        let resp = app
            .clone()
            .oneshot(post_entry(r#"{"text": "hello"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp).await;
        assert_eq!(json["entry"]["id"], 1);
        assert_eq!(json["entry"]["text"], "hello");
        assert!(json["entry"]["created_at"].is_string());

        let resp = app.oneshot(get_entries()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["text"], "hello");
    }

    #[tokio::test]
    async fn get_returns_newest_first_capped_at_ten() {
        let app = test_app();
        for i in 0..12 {
            let resp = app
                .clone()
                .oneshot(post_entry(&format!(r#"{{"text": "message {i}"}}"#)))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp = app.oneshot(get_entries()).await.unwrap();
        let json = body_json(resp).await;
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0]["text"], "message 11");
        assert_eq!(entries[9]["text"], "message 2");
    }

    #[tokio::test]
    async fn post_empty_text_is_rejected() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(post_entry(r#"{"text": "   "}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].is_string());

        assert_eq!(entry_count(&app).await, 0);
    }

    #[tokio::test]
    async fn post_over_length_text_is_rejected() {
        let app = test_app();
        let long = "x".repeat(281);
        let resp = app
            .clone()
            .oneshot(post_entry(&format!(r#"{{"text": "{long}"}}"#)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert_eq!(entry_count(&app).await, 0);
    }

    #[tokio::test]
    async fn post_missing_text_field() {
        let app = test_app();
        let resp = app.oneshot(post_entry(r#"{}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Text field is required and must be a string");
    }

    #[tokio::test]
    async fn post_non_string_text_field() {
        let app = test_app();
        let resp = app.oneshot(post_entry(r#"{"text": 42}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Text field is required and must be a string");
    }

    #[tokio::test]
    async fn post_plain_text_body_is_rejected_with_json_error() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/entries")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Text field is required and must be a string");

        assert_eq!(entry_count(&app).await, 0);
    }

    #[tokio::test]
    async fn post_malformed_json_body_is_rejected_with_json_error() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(post_entry(r#"{"text": "unterminated"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Text field is required and must be a string");

        assert_eq!(entry_count(&app).await, 0);
    }

    #[tokio::test]
    async fn delete_is_method_not_allowed() {
        let app = test_app();
        let resp = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/entries")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Method not allowed");
    }
}
