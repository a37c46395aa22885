//! Request handlers for `/platforms` and `/health`.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::error::{LookupError, UploadError, UploadResult};
use crate::state::AppState;

/// Name of the multipart field carrying the data file.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    path: Option<String>,
}

/// `GET /platforms?path=/ru/svrd`
///
/// 200 with the covering platform names, 404 if none, 400 if the path is
/// missing or malformed.
pub async fn find_platforms(
    State(state): State<AppState>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return bad_lookup(rejection.body_text()),
    };
    let Some(path) = params.path else {
        return bad_lookup("the 'path' query parameter is required".to_string());
    };

    match state.lookup(&path).await {
        Ok(names) if names.is_empty() => StatusCode::NOT_FOUND.into_response(),
        Ok(names) => (StatusCode::OK, Json(names)).into_response(),
        Err(err) => {
            tracing::warn!(%path, error = %err, "rejected lookup");
            bad_lookup(err.to_string())
        }
    }
}

fn bad_lookup(errors: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(LookupError { errors })).into_response()
}

/// `POST /platforms` with a multipart `file` field.
///
/// Any upload, successful or not, discards the previously loaded hierarchy.
pub async fn upload_platforms(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let outcome = match read_upload(multipart).await {
        Ok(text) => state.load(&text).await,
        Err(err) => match state.clear().await {
            Ok(()) => Err(err),
            Err(clear_err) => Err(clear_err.into()),
        },
    };

    match outcome {
        Ok(()) => {
            let platforms = state.platform_count().await;
            tracing::info!(platforms, "platform hierarchy uploaded");
            (StatusCode::OK, Json(UploadResult::default())).into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "rejected upload");
            (StatusCode::BAD_REQUEST, Json(UploadResult::failed(&err))).into_response()
        }
    }
}

async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, UploadError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await?;
            return String::from_utf8(bytes.to_vec()).map_err(|_| UploadError::NotUtf8);
        }
    }
    Err(UploadError::NoFile)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "platforms": state.platform_count().await,
    }))
}
