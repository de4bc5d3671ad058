//! Galaxy endpoints: list, detail, add, update, remove.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use super::error::ApiError;
use super::extract::{AuthenticatedUser, GalaxyId, Validated};
use super::forms::{GalaxyForm, GalaxyUpdateForm};
use super::{AppState, message};
use crate::error::DatabaseError;
use crate::model::Galaxy;

const GALAXY_EXISTS: &str = "There is already a galaxy by that name";

/// GET /galaxies
pub async fn list_galaxies(State(state): State<AppState>) -> Result<Json<Vec<Galaxy>>, ApiError> {
    let galaxies = state.db.list_galaxies().await?;
    Ok(Json(galaxies))
}

/// GET /galaxy_details/{galaxy_id}
pub async fn galaxy_details(
    State(state): State<AppState>,
    GalaxyId(galaxy_id): GalaxyId,
) -> Result<Json<Galaxy>, ApiError> {
    state
        .db
        .get_galaxy(galaxy_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Galaxy does not exist".to_string()))
}

/// POST /add_galaxy
pub async fn add_galaxy(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Validated(GalaxyForm(fields)): Validated<GalaxyForm>,
) -> Result<Response, ApiError> {
    if state
        .db
        .find_galaxy_by_name(&fields.galaxy_name)
        .await?
        .is_some()
    {
        warn!(name = %fields.galaxy_name, "Rejected duplicate galaxy name");
        return Err(ApiError::Conflict(GALAXY_EXISTS.to_string()));
    }

    let galaxy_id = state
        .db
        .insert_galaxy(&fields)
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict { .. } => ApiError::Conflict(GALAXY_EXISTS.to_string()),
            other => other.into(),
        })?;

    info!(galaxy_id, by = %user.identity, "Galaxy added");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Galaxy added",
            "galaxy_id": galaxy_id,
        })),
    )
        .into_response())
}

/// PUT /update_galaxy
pub async fn update_galaxy(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Validated(form): Validated<GalaxyUpdateForm>,
) -> Result<Response, ApiError> {
    let not_found = || ApiError::NotFound("Galaxy does not exist".to_string());

    if state.db.get_galaxy(form.galaxy_id).await?.is_none() {
        return Err(not_found());
    }
    if !state.db.update_galaxy(form.galaxy_id, &form.fields).await? {
        return Err(not_found());
    }

    info!(galaxy_id = form.galaxy_id, by = %user.identity, "Galaxy updated");
    Ok(message(StatusCode::ACCEPTED, "Galaxy updated"))
}

/// DELETE /remove_galaxy/{galaxy_id}
pub async fn remove_galaxy(
    State(state): State<AppState>,
    GalaxyId(galaxy_id): GalaxyId,
    user: AuthenticatedUser,
) -> Result<Response, ApiError> {
    let not_found = || ApiError::NotFound("That galaxy does not exist".to_string());

    if state.db.get_galaxy(galaxy_id).await?.is_none() {
        return Err(not_found());
    }
    if !state.db.delete_galaxy(galaxy_id).await? {
        return Err(not_found());
    }

    info!(galaxy_id, by = %user.identity, "Galaxy removed");
    Ok(message(StatusCode::ACCEPTED, "You deleted a galaxy"))
}
