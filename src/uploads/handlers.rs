use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::dto::UploadResponse;
use super::services::{store_upload, UploadItem};

const FILE_FIELD: &str = "file";

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .layer(DefaultBodyLimit::disable())
}

/// POST /upload (multipart, single field `file`)
#[instrument(skip(state, mp))]
pub async fn upload_file(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let no_file = || ApiError::BadRequest("No file uploaded".into());

    let mut mp = mp.map_err(|e| {
        warn!(error = %e, "upload without multipart body");
        no_file()
    })?;

    loop {
        let field = match mp.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "malformed multipart body");
                return Err(no_file());
            }
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // an empty <input type=file> still sends the part, with filename=""
        let Some(original_name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(|s| s.to_string())
        else {
            continue;
        };
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = field.bytes().await.map_err(|e| {
            warn!(error = %e, "reading upload body failed");
            no_file()
        })?;

        let stored = store_upload(
            &state,
            UploadItem {
                original_name: &original_name,
                content_type: &content_type,
                body,
            },
        )
        .await
        .map_err(|e| ApiError::internal("Failed to store the uploaded file.", e))?;

        info!(file = %stored.name, "file uploaded");
        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".into(),
            file_path: stored.public_path,
        }));
    }

    Err(no_file())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::{
        multipart::{MultipartForm, Part},
        TestServer,
    };
    use serde_json::Value;
    use std::sync::Arc;

    use crate::state::{testing, AppState};
    use crate::storage::{LocalStorage, UPLOADS_MOUNT};

    #[tokio::test]
    async fn uploads_file_and_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let fake = testing::fake(dir.path());
        let server = TestServer::new(super::upload_routes().with_state(fake.state.clone())).unwrap();

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"\x89PNG-bytes".to_vec())
                .file_name("photo.png")
                .mime_type("image/png"),
        );
        let res = server.post("/upload").multipart(form).await;
        res.assert_status_ok();

        let v: Value = res.json();
        assert_eq!(v["message"], "File uploaded successfully");
        let path = v["filePath"].as_str().unwrap();
        let name = path.strip_prefix("/uploads/").expect("served under /uploads");
        assert!(name.ends_with("-photo.png"));
        assert_eq!(
            std::fs::read(fake.state.config.upload_dir.join(name)).unwrap(),
            b"\x89PNG-bytes"
        );
    }

    #[tokio::test]
    async fn missing_file_field_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let fake = testing::fake(dir.path());
        let server = TestServer::new(super::upload_routes().with_state(fake.state.clone())).unwrap();

        let form = MultipartForm::new().add_text("comment", "no attachment");
        let res = server.post("/upload").multipart(form).await;
        res.assert_status(StatusCode::BAD_REQUEST);
        let v: Value = res.json();
        assert_eq!(v["message"], "No file uploaded");

        let entries = std::fs::read_dir(&fake.state.config.upload_dir).unwrap().count();
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn empty_file_input_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let fake = testing::fake(dir.path());
        let server = TestServer::new(super::upload_routes().with_state(fake.state.clone())).unwrap();

        let form = MultipartForm::new().add_part("file", Part::bytes(Vec::new()).file_name(""));
        let res = server.post("/upload").multipart(form).await;
        res.assert_status(StatusCode::BAD_REQUEST);
        let v: Value = res.json();
        assert_eq!(v["message"], "No file uploaded");

        let entries = std::fs::read_dir(&fake.state.config.upload_dir).unwrap().count();
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn write_failure_returns_generic_500() {
        let dir = tempfile::tempdir().unwrap();
        let fake = testing::fake(dir.path());
        let missing = dir.path().join("removed");
        let state = AppState::from_parts(
            fake.state.config.clone(),
            fake.state.users.clone(),
            fake.state.messages.clone(),
            Arc::new(LocalStorage::new(&missing, UPLOADS_MOUNT)),
            None,
        );
        let server = TestServer::new(super::upload_routes().with_state(state)).unwrap();

        let form = MultipartForm::new()
            .add_part("file", Part::bytes(b"data".to_vec()).file_name("photo.png"));
        let res = server.post("/upload").multipart(form).await;
        res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let v: Value = res.json();
        assert_eq!(v["message"], "Failed to store the uploaded file.");
        assert!(!res.text().contains("removed"));
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn non_multipart_body_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let fake = testing::fake(dir.path());
        let server = TestServer::new(super::upload_routes().with_state(fake.state.clone())).unwrap();

        let res = server.post("/upload").text("just text").await;
        res.assert_status(StatusCode::BAD_REQUEST);
    }
}
