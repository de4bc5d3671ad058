//! HTTP surface: router, shared state and request handlers.

pub mod demo;
pub mod error;
pub mod extract;
pub mod forms;
pub mod galaxies;
pub mod users;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::auth::TokenIssuer;
use crate::mail::Notifier;
use crate::store::Database;

pub use error::ApiError;

/// Collaborators shared by every handler. Handlers hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub tokens: Arc<TokenIssuer>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, tokens: TokenIssuer, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            notifier,
        }
    }
}

/// Build the Axum router with every public route.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(demo::health))
        .route("/not_found", get(demo::not_found))
        .route("/parameters", get(demo::parameters))
        .route("/url_variables/{name}/{age}", get(demo::url_variables))
        .route("/galaxies", get(galaxies::list_galaxies))
        .route("/galaxy_details/{galaxy_id}", get(galaxies::galaxy_details))
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/retrieve_password/{email}", get(users::retrieve_password))
        .route("/add_galaxy", post(galaxies::add_galaxy))
        .route("/update_galaxy", put(galaxies::update_galaxy))
        .route("/remove_galaxy/{galaxy_id}", delete(galaxies::remove_galaxy))
        .fallback(demo::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A `{"message": ...}` response.
pub(crate) fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(serde_json::json!({ "message": text }))).into_response()
}
