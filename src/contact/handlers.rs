use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    contact::{dto::ContactRequest, services::save_message},
    error::{ApiError, MessageResponse},
    state::AppState,
};

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(submit_contact))
        // older clients still post here and expect 200
        .route("/contact", post(submit_contact_legacy))
}

#[instrument(skip(state, payload))]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    save_message(&state, payload.into())
        .await
        .map_err(|e| ApiError::internal("Failed to send the message. Please try again.", e))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Your message has been sent successfully!")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn submit_contact_legacy(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    save_message(&state, payload.into())
        .await
        .map_err(|e| ApiError::internal("Failed to save message", e))?;

    Ok(Json(MessageResponse::new("Message saved successfully")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::contact::repo::memory::MemoryMessageRepo;
    use crate::state::{testing, AppState};

    fn body() -> Value {
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Hi!" })
    }

    #[tokio::test]
    async fn api_contact_returns_created() {
        let dir = tempfile::tempdir().unwrap();
        let fake = testing::fake(dir.path());
        let server = TestServer::new(super::contact_routes().with_state(fake.state.clone())).unwrap();

        let res = server.post("/api/contact").json(&body()).await;
        res.assert_status(StatusCode::CREATED);
        let v: Value = res.json();
        assert_eq!(v["message"], "Your message has been sent successfully!");

        let stored = fake.messages.all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].message, "Hi!");
    }

    #[tokio::test]
    async fn legacy_contact_returns_ok() {
        let dir = tempfile::tempdir().unwrap();
        let fake = testing::fake(dir.path());
        let server = TestServer::new(super::contact_routes().with_state(fake.state.clone())).unwrap();

        let res = server.post("/contact").json(&body()).await;
        res.assert_status_ok();
        let v: Value = res.json();
        assert_eq!(v["message"], "Message saved successfully");
        assert_eq!(fake.messages.all().len(), 1);
    }

    #[tokio::test]
    async fn store_failure_returns_generic_500() {
        let dir = tempfile::tempdir().unwrap();
        let fake = testing::fake(dir.path());
        let state = AppState::from_parts(
            fake.state.config.clone(),
            fake.state.users.clone(),
            Arc::new(MemoryMessageRepo::failing()),
            fake.state.storage.clone(),
            None,
        );
        let server = TestServer::new(super::contact_routes().with_state(state)).unwrap();

        let res = server.post("/api/contact").json(&body()).await;
        res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let v: Value = res.json();
        assert_eq!(v["message"], "Failed to send the message. Please try again.");
        assert!(!res.text().contains("connection refused"));

        let res = server.post("/contact").json(&body()).await;
        res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let v: Value = res.json();
        assert_eq!(v["message"], "Failed to save message");
    }
}
