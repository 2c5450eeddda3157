use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::SignupRequest,
        services::{is_valid_email, normalize_email, signup, SignupOutcome},
    },
    error::{ApiError, MessageResponse},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/api/auth/signup", post(signup_handler))
}

#[instrument(skip(state, payload))]
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);
    payload.name = payload.name.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.name.is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("Password is required".into()));
    }

    let email = payload.email.clone();
    match signup(state.users.as_ref(), payload).await {
        Ok(SignupOutcome::Created(user)) => {
            info!(user_id = %user.id, email = %user.email, "user signed up");
            Ok(Json(MessageResponse::new("Signup successful. Please log in.")))
        }
        Ok(SignupOutcome::AlreadyExists) => {
            warn!(%email, "email already registered");
            Err(ApiError::Conflict("User already exists. Please log in.".into()))
        }
        Err(e) => Err(ApiError::internal("An error occurred. Please try again.", e)),
    }
}
