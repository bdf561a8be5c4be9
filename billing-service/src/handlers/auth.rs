//! Password login for the editing UI.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use billing_core::error::AppError;

use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// `POST /login`. A wrong password reports on the 401 path so the UI can
/// tell it apart from server failures.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if request.password != state.config.auth.password {
        return Err(AppError::Unauthorized(anyhow::anyhow!("invalid password")));
    }

    Ok(Json(LoginResponse {
        token: Uuid::new_v4().to_string(),
    }))
}
