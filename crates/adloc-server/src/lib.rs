//! HTTP endpoints for the adloc platform hierarchy.
//!
//! | Route | Success | Failure |
//! |-------|---------|---------|
//! | `GET /platforms?path=..` | 200 `["name", ...]`, 404 when nothing covers the path | 400 `{"errors": "..."}` |
//! | `POST /platforms` (multipart `file`) | 200 `{"errors": []}` | 400 `{"errors": [...]}` |
//! | `GET /health` | 200 `{"status": "ok", "platforms": n}` | |
//!
//! Every upload replaces the loaded hierarchy; a rejected upload leaves it
//! empty.

pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

pub use error::{UploadError, UploadResult};
pub use state::AppState;

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/platforms",
            get(handlers::find_platforms).post(handlers::upload_platforms),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serve the router on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("adloc listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("adloc server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LookupError, UPLOAD_FAILED};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    const VALID_DATA: &str = "Yandex.Marketing:/ru\nVkusno i tochka:/ru/vkustoch,/ru/nevktch";
    const BOUNDARY: &str = "adloc-test-boundary";

    fn upload_request(field: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"platforms.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/platforms")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn lookup_request(query: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/platforms{query}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn send(state: &AppState, request: Request<Body>) -> Response {
        router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn loaded_state() -> AppState {
        let state = AppState::default();
        let response = send(&state, upload_request("file", VALID_DATA)).await;
        assert_eq!(response.status(), StatusCode::OK);
        state
    }

    #[tokio::test]
    async fn upload_valid_file_returns_ok() {
        let state = AppState::default();
        let response = send(&state, upload_request("file", VALID_DATA)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let result: UploadResult = body_json(response).await;
        assert!(result.errors.is_empty());
        assert_eq!(state.platform_count().await, 3);
    }

    #[tokio::test]
    async fn get_valid_location_returns_names() {
        let state = loaded_state().await;
        let response = send(&state, lookup_request("?path=/ru/vkustoch")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let names: Vec<String> = body_json(response).await;
        assert_eq!(names, vec!["Yandex.Marketing", "Vkusno i tochka"]);
    }

    #[tokio::test]
    async fn get_unknown_location_returns_not_found() {
        let state = loaded_state().await;
        let response = send(&state, lookup_request("?path=/notFound")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_invalid_location_returns_bad_request() {
        let state = loaded_state().await;
        for query in ["?path=/", "?path=%20", "?path=/Invalid%20path/invalid//", ""] {
            let response = send(&state, lookup_request(query)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query}");
            let body: LookupError = body_json(response).await;
            assert!(!body.errors.is_empty());
        }
    }

    #[tokio::test]
    async fn undecodable_query_returns_json_bad_request() {
        let state = loaded_state().await;
        let response = send(&state, lookup_request("?path=/ru&path=/ru/msk")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: LookupError = body_json(response).await;
        assert!(error.errors.contains("path"), "{}", error.errors);
        assert_eq!(state.platform_count().await, 3);
    }

    #[tokio::test]
    async fn upload_without_file_returns_bad_request() {
        let state = loaded_state().await;
        let response = send(&state, upload_request("attachment", VALID_DATA)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let result: UploadResult = body_json(response).await;
        assert_eq!(result.errors[0], UPLOAD_FAILED);
        assert_eq!(result.errors[1], "no file supplied");
        assert!(state.tree().read().await.is_empty());
    }

    #[tokio::test]
    async fn upload_non_multipart_returns_bad_request() {
        let state = AppState::default();
        let request = Request::builder()
            .method("POST")
            .uri("/platforms")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(VALID_DATA))
            .unwrap();
        let response = send(&state, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_invalid_content_clears_previous_data() {
        for content in ["", " ", "Impossible text to parse"] {
            let state = loaded_state().await;
            let response = send(&state, upload_request("file", content)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{content:?}");
            let result: UploadResult = body_json(response).await;
            assert_eq!(result.errors.len(), 2);

            let response = send(&state, lookup_request("?path=/ru/vkustoch")).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn health_reports_platform_count() {
        let state = loaded_state().await;
        let response = send(
            &state,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["platforms"], 3);
    }
}
