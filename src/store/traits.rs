//! `Database` trait: single async interface for all persistence.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::model::{Galaxy, GalaxyFields, NewUser, User};

/// Backend-agnostic database trait covering users and galaxies.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    /// Drop every table owned by the schema.
    async fn drop_schema(&self) -> Result<(), DatabaseError>;

    // ── Galaxies ────────────────────────────────────────────────────

    /// All galaxies, ordered by id.
    async fn list_galaxies(&self) -> Result<Vec<Galaxy>, DatabaseError>;

    /// Get a galaxy by id.
    async fn get_galaxy(&self, galaxy_id: i64) -> Result<Option<Galaxy>, DatabaseError>;

    /// Look up a galaxy by its name.
    async fn find_galaxy_by_name(&self, name: &str) -> Result<Option<Galaxy>, DatabaseError>;

    /// Insert a galaxy and return its new id.
    ///
    /// Fails with [`DatabaseError::Conflict`] when the name is already taken.
    async fn insert_galaxy(&self, fields: &GalaxyFields) -> Result<i64, DatabaseError>;

    /// Replace every attribute of a galaxy. Returns `false` if no row matched.
    async fn update_galaxy(
        &self,
        galaxy_id: i64,
        fields: &GalaxyFields,
    ) -> Result<bool, DatabaseError>;

    /// Delete a galaxy. Returns `false` if no row matched.
    async fn delete_galaxy(&self, galaxy_id: i64) -> Result<bool, DatabaseError>;

    // ── Users ───────────────────────────────────────────────────────

    /// Look up a user by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Look up a user whose email and password both match exactly.
    async fn find_user_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DatabaseError>;

    /// Insert a user and return the new id.
    ///
    /// Fails with [`DatabaseError::Conflict`] when the email is already registered.
    async fn insert_user(&self, user: &NewUser) -> Result<i64, DatabaseError>;
}
