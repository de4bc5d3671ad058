//! User endpoints: registration, login and password retrieval.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use super::error::ApiError;
use super::extract::{JsonOrForm, PathParams, Validated};
use super::forms::{LoginForm, RegisterForm};
use super::{AppState, message};
use crate::error::DatabaseError;
use crate::mail::Notification;

const EMAIL_EXISTS: &str = "Email already exists.";

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Validated(RegisterForm(user)): Validated<RegisterForm>,
) -> Result<Response, ApiError> {
    if state.db.find_user_by_email(&user.email).await?.is_some() {
        warn!(email = %user.email, "Rejected duplicate registration");
        return Err(ApiError::Conflict(EMAIL_EXISTS.to_string()));
    }

    let user_id = state.db.insert_user(&user).await.map_err(|e| match e {
        DatabaseError::Conflict { .. } => ApiError::Conflict(EMAIL_EXISTS.to_string()),
        other => other.into(),
    })?;

    info!(user_id, "User registered");
    Ok(message(StatusCode::CREATED, "User created successfully."))
}

/// POST /login
///
/// Accepts a JSON body when the request declares one, form fields otherwise.
pub async fn login(
    State(state): State<AppState>,
    JsonOrForm(form): JsonOrForm<LoginForm>,
) -> Result<Response, ApiError> {
    let user = state
        .db
        .find_user_by_credentials(&form.email, &form.password)
        .await?;

    let Some(user) = user else {
        warn!(email = %form.email, "Login failed");
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    };

    let access_token = state.tokens.issue(&user.email)?;
    info!(user_id = user.id, "Login successful");
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Login successful!",
            "access_token": access_token,
        })),
    )
        .into_response())
}

/// GET /retrieve_password/{email}
pub async fn retrieve_password(
    State(state): State<AppState>,
    PathParams(email): PathParams<String>,
) -> Result<Response, ApiError> {
    let Some(user) = state.db.find_user_by_email(&email).await? else {
        warn!(email = %email, "Password retrieval for unknown email");
        return Err(ApiError::Unauthorized("Email doesn't exist".to_string()));
    };

    state
        .notifier
        .send(Notification::password_reminder(&email, &user.password))
        .await?;

    info!(user_id = user.id, "Password reminder sent");
    Ok(message(StatusCode::OK, &format!("Password sent to {email}")))
}
