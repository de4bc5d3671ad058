//! Probe endpoints: health, the not-found probe and the two age gates.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::extract::{PathParams, Validated, parse_int_segment};
use super::forms::AgeQuery;
use super::message;

const MIN_AGE: i64 = 18;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "galaxy-api"
    }))
}

/// GET /not_found, and the fallback for unmatched routes.
pub async fn not_found() -> Response {
    message(StatusCode::NOT_FOUND, "Not found")
}

/// GET /parameters?name=&age=
pub async fn parameters(Validated(query): Validated<AgeQuery>) -> Result<Response, ApiError> {
    if query.age < MIN_AGE {
        return Err(ApiError::Unauthorized("Age restricted".to_string()));
    }
    Ok(message(StatusCode::OK, "Welcome!"))
}

/// GET /url_variables/{name}/{age}
pub async fn url_variables(
    PathParams((_name, raw_age)): PathParams<(String, String)>,
) -> Result<Response, ApiError> {
    let age = parse_int_segment(&raw_age)?;
    if age < MIN_AGE {
        return Err(ApiError::Unauthorized("Age restriction".to_string()));
    }
    Ok(message(StatusCode::OK, "Welcome!"))
}
