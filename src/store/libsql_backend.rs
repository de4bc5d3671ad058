//! libSQL backend: async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{Connection, Database as LibSqlDatabase, Rows, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::model::{Galaxy, GalaxyFields, NewUser, User};
use crate::store::migrations;
use crate::store::traits::Database;

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file without touching the schema.
    pub async fn open_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        info!(path = %path.display(), "Database opened");
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        let backend = Self::open_local(path).await?;
        backend.run_migrations().await?;
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

const GALAXY_COLUMNS: &str = "galaxy_id, galaxy_name, galaxy_type, home_star, mass, distance";

const USER_COLUMNS: &str = "id, first_name, last_name, email, password";

/// Map a libsql Row to a Galaxy. Column order matches GALAXY_COLUMNS.
fn row_to_galaxy(row: &libsql::Row) -> Result<Galaxy, libsql::Error> {
    Ok(Galaxy {
        galaxy_id: row.get(0)?,
        galaxy_name: row.get(1)?,
        galaxy_type: row.get(2)?,
        home_star: row.get(3)?,
        mass: row.get(4)?,
        distance: row.get(5)?,
    })
}

/// Map a libsql Row to a User. Column order matches USER_COLUMNS.
fn row_to_user(row: &libsql::Row) -> Result<User, libsql::Error> {
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password: row.get(4)?,
    })
}

/// Read at most one row from a result set.
async fn first_row<T>(
    mut rows: Rows,
    op: &str,
    map: fn(&libsql::Row) -> Result<T, libsql::Error>,
) -> Result<Option<T>, DatabaseError> {
    match rows.next().await {
        Ok(Some(row)) => map(&row)
            .map(Some)
            .map_err(|e| DatabaseError::Query(format!("{op} row parse: {e}"))),
        Ok(None) => Ok(None),
        Err(e) => Err(DatabaseError::Query(format!("{op}: {e}"))),
    }
}

/// Whether a libsql error is a uniqueness violation.
fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    async fn drop_schema(&self) -> Result<(), DatabaseError> {
        migrations::drop_schema(self.conn()).await
    }

    // ── Galaxies ────────────────────────────────────────────────────

    async fn list_galaxies(&self) -> Result<Vec<Galaxy>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {GALAXY_COLUMNS} FROM galaxies ORDER BY galaxy_id ASC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_galaxies: {e}")))?;

        let mut galaxies = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => {
                    let galaxy = row_to_galaxy(&row).map_err(|e| {
                        DatabaseError::Query(format!("list_galaxies row parse: {e}"))
                    })?;
                    galaxies.push(galaxy);
                }
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("list_galaxies: {e}"))),
            }
        }
        debug!(count = galaxies.len(), "Galaxies listed");
        Ok(galaxies)
    }

    async fn get_galaxy(&self, galaxy_id: i64) -> Result<Option<Galaxy>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!("SELECT {GALAXY_COLUMNS} FROM galaxies WHERE galaxy_id = ?1"),
                params![galaxy_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_galaxy: {e}")))?;

        first_row(rows, "get_galaxy", row_to_galaxy).await
    }

    async fn find_galaxy_by_name(&self, name: &str) -> Result<Option<Galaxy>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {GALAXY_COLUMNS} FROM galaxies WHERE galaxy_name = ?1 ORDER BY galaxy_id LIMIT 1"
                ),
                params![name],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("find_galaxy_by_name: {e}")))?;

        first_row(rows, "find_galaxy_by_name", row_to_galaxy).await
    }

    async fn insert_galaxy(&self, fields: &GalaxyFields) -> Result<i64, DatabaseError> {
        // Conditional insert: the name check and the write happen in one statement.
        let rows = self
            .conn()
            .query(
                "INSERT INTO galaxies (galaxy_name, galaxy_type, home_star, mass, distance)
                 SELECT ?1, ?2, ?3, ?4, ?5
                 WHERE NOT EXISTS (SELECT 1 FROM galaxies WHERE galaxy_name = ?1)
                 RETURNING galaxy_id",
                params![
                    fields.galaxy_name.as_str(),
                    fields.galaxy_type.as_str(),
                    fields.home_star.as_str(),
                    fields.mass,
                    fields.distance,
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("insert_galaxy: {e}")))?;

        match first_row(rows, "insert_galaxy", |row| row.get::<i64>(0)).await? {
            Some(galaxy_id) => {
                info!(galaxy_id, name = %fields.galaxy_name, "Galaxy inserted into DB");
                Ok(galaxy_id)
            }
            None => Err(DatabaseError::Conflict {
                entity: "galaxy".into(),
                key: format!("galaxy_name {}", fields.galaxy_name),
            }),
        }
    }

    async fn update_galaxy(
        &self,
        galaxy_id: i64,
        fields: &GalaxyFields,
    ) -> Result<bool, DatabaseError> {
        let count = self
            .conn()
            .execute(
                "UPDATE galaxies
                 SET galaxy_name = ?1, galaxy_type = ?2, home_star = ?3, mass = ?4, distance = ?5
                 WHERE galaxy_id = ?6",
                params![
                    fields.galaxy_name.as_str(),
                    fields.galaxy_type.as_str(),
                    fields.home_star.as_str(),
                    fields.mass,
                    fields.distance,
                    galaxy_id,
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("update_galaxy: {e}")))?;

        if count > 0 {
            info!(galaxy_id, "Galaxy updated in DB");
        }
        Ok(count > 0)
    }

    async fn delete_galaxy(&self, galaxy_id: i64) -> Result<bool, DatabaseError> {
        let count = self
            .conn()
            .execute(
                "DELETE FROM galaxies WHERE galaxy_id = ?1",
                params![galaxy_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_galaxy: {e}")))?;

        if count > 0 {
            info!(galaxy_id, "Galaxy deleted from DB");
        }
        Ok(count > 0)
    }

    // ── Users ───────────────────────────────────────────────────────

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("find_user_by_email: {e}")))?;

        first_row(rows, "find_user_by_email", row_to_user).await
    }

    async fn find_user_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 AND password = ?2"),
                params![email, password],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("find_user_by_credentials: {e}")))?;

        first_row(rows, "find_user_by_credentials", row_to_user).await
    }

    async fn insert_user(&self, user: &NewUser) -> Result<i64, DatabaseError> {
        let conflict = || DatabaseError::Conflict {
            entity: "user".into(),
            key: format!("email {}", user.email),
        };

        let mut rows = self
            .conn()
            .query(
                "INSERT INTO users (first_name, last_name, email, password)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id",
                params![
                    user.first_name.as_str(),
                    user.last_name.as_str(),
                    user.email.as_str(),
                    user.password.as_str(),
                ],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    conflict()
                } else {
                    DatabaseError::Query(format!("insert_user: {e}"))
                }
            })?;

        match rows.next().await {
            Ok(Some(row)) => {
                let id: i64 = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("insert_user row parse: {e}")))?;
                info!(user_id = id, "User inserted into DB");
                Ok(id)
            }
            Ok(None) => Err(DatabaseError::Query(
                "insert_user: no id returned".to_string(),
            )),
            Err(e) if is_unique_violation(&e) => Err(conflict()),
            Err(e) => Err(DatabaseError::Query(format!("insert_user: {e}"))),
        }
    }
}
