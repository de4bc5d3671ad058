//! Request extractors: form fields (urlencoded or multipart), JSON-or-form
//! bodies, bearer auth and path segments.
//!
//! Everything here runs before a handler body, so handlers only ever see
//! typed, validated input.

use std::collections::HashMap;

use axum::extract::{Form, FromRequest, FromRequestParts, Json, Multipart, Path, Request};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, request::Parts};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::AppState;
use super::error::ApiError;

const BAD_AUTH_HEADER: &str = "Bad Authorization header. Expected 'Authorization: Bearer <JWT>'";

// ── Raw fields ──────────────────────────────────────────────────────────

/// String fields of a form body, query string or flat JSON object.
#[derive(Debug, Clone, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self(fields)
    }

    pub fn optional(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &str) -> Result<&str, ApiError> {
        self.optional(name)
            .ok_or_else(|| ApiError::Validation(format!("Missing required field: {name}")))
    }

    pub fn required_string(&self, name: &str) -> Result<String, ApiError> {
        self.required(name).map(str::to_string)
    }

    /// Parse a finite float.
    pub fn required_f64(&self, name: &str) -> Result<f64, ApiError> {
        let raw = self.required(name)?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ApiError::Validation(format!("Field {name} must be a number")))
    }

    pub fn required_i64(&self, name: &str) -> Result<i64, ApiError> {
        let raw = self.required(name)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| ApiError::Validation(format!("Field {name} must be an integer")))
    }

    /// Flatten a JSON object: strings kept, numbers and booleans stringified,
    /// everything else dropped.
    fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                Value::Number(n) => Some((key, n.to_string())),
                Value::Bool(b) => Some((key, b.to_string())),
                _ => None,
            })
            .collect();
        Self(fields)
    }

    async fn from_form<S: Send + Sync>(req: Request, state: &S) -> Result<Self, ApiError> {
        if is_multipart_request(req.headers()) {
            return Self::from_multipart(req, state).await;
        }
        let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(Self(fields))
    }

    /// Text parts of a `multipart/form-data` body. File uploads are ignored.
    async fn from_multipart<S: Send + Sync>(req: Request, state: &S) -> Result<Self, ApiError> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if field.file_name().is_some() {
                continue;
            }
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            fields.entry(name).or_insert(value);
        }
        Ok(Self(fields))
    }

    async fn from_json<S: Send + Sync>(req: Request, state: &S) -> Result<Self, ApiError> {
        let Json(object) = Json::<serde_json::Map<String, Value>>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(Self::from_json_object(object))
    }
}

/// Whether the request declares a JSON body (`application/json` or `+json`).
pub fn is_json_request(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json"
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

fn is_multipart_request(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("multipart/form-data"))
}

// ── Typed extraction ────────────────────────────────────────────────────

/// A typed request built from raw fields.
pub trait FromFields: Sized {
    fn from_fields(fields: &FormFields) -> Result<Self, ApiError>;
}

/// Parses form fields (the query string for GET) into `T`.
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: FromFields,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let fields = FormFields::from_form(req, state).await?;
        T::from_fields(&fields).map(Validated)
    }
}

/// Parses a JSON body when the request declares one, form fields otherwise.
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: FromFields,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let fields = if is_json_request(req.headers()) {
            FormFields::from_json(req, state).await?
        } else {
            FormFields::from_form(req, state).await?
        };
        T::from_fields(&fields).map(JsonOrForm)
    }
}

// ── Bearer auth ─────────────────────────────────────────────────────────

/// Identity proven by a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: String,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).ok_or_else(|| {
            warn!(path = %parts.uri.path(), "Rejected request without Authorization header");
            ApiError::Unauthorized("Missing Authorization Header".to_string())
        })?;

        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.contains(' '))
            .ok_or_else(|| ApiError::Unauthorized(BAD_AUTH_HEADER.to_string()))?;

        let claims = state.tokens.verify(token).map_err(|e| {
            warn!(path = %parts.uri.path(), error = %e, "Rejected bearer token");
            ApiError::from(e)
        })?;

        Ok(Self {
            identity: claims.sub,
        })
    }
}

// ── Path segments ───────────────────────────────────────────────────────

/// `Path<T>` whose rejection renders as a JSON `ApiError`.
pub struct PathParams<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) if rejection.status().is_client_error() => {
                Err(ApiError::Validation(rejection.body_text()))
            }
            Err(rejection) => Err(ApiError::Internal(rejection.body_text())),
        }
    }
}

/// The `{galaxy_id}` segment. Runs ahead of auth, so a non-numeric id is a
/// 404 whether or not a token was sent.
#[derive(Debug, Clone, Copy)]
pub struct GalaxyId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for GalaxyId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let PathParams(raw) = PathParams::<String>::from_request_parts(parts, state).await?;
        parse_int_segment(&raw).map(Self)
    }
}

/// Parse an unsigned decimal path segment. Anything else does not match the
/// route and is reported as a plain 404. Values past `i64::MAX` saturate.
pub fn parse_int_segment(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::NotFound("Not found".to_string()));
    }
    Ok(raw.parse::<i64>().unwrap_or(i64::MAX))
}
