//! Schema bootstrap and sample data for the `galaxy-admin` binary.

use tracing::info;

use crate::error::DatabaseError;
use crate::model::{GalaxyFields, NewUser};
use crate::store::Database;

/// What a seed run inserted and what it found already present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub galaxies_inserted: usize,
    pub galaxies_skipped: usize,
    pub users_inserted: usize,
    pub users_skipped: usize,
}

/// The three sample galaxies, in insertion order.
pub fn seed_galaxies() -> Vec<GalaxyFields> {
    vec![
        GalaxyFields::new("MilkyWay", "spiral", "Astar", 1.5, 25000.0),
        GalaxyFields::new("Andromeda", "spiral", "M31", 1.23, 2.537),
        GalaxyFields::new("Messier81", "sbspiral", "M81", 5.97, 92.9),
    ]
}

pub fn seed_user() -> NewUser {
    NewUser {
        first_name: "Ayaan".to_string(),
        last_name: "Mohammed".to_string(),
        email: "sample@test.com".to_string(),
        password: "Password1".to_string(),
    }
}

pub async fn create_schema(db: &dyn Database) -> Result<(), DatabaseError> {
    db.run_migrations().await?;
    info!("Database created");
    Ok(())
}

pub async fn drop_schema(db: &dyn Database) -> Result<(), DatabaseError> {
    db.drop_schema().await?;
    info!("Database dropped");
    Ok(())
}

/// Insert the sample records. Records that already exist are left alone.
pub async fn seed(db: &dyn Database) -> Result<SeedReport, DatabaseError> {
    let mut report = SeedReport::default();

    for galaxy in seed_galaxies() {
        match db.insert_galaxy(&galaxy).await {
            Ok(galaxy_id) => {
                info!(galaxy_id, name = %galaxy.galaxy_name, "Seeded galaxy");
                report.galaxies_inserted += 1;
            }
            Err(DatabaseError::Conflict { .. }) => {
                info!(name = %galaxy.galaxy_name, "Galaxy already present, skipping");
                report.galaxies_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let user = seed_user();
    match db.insert_user(&user).await {
        Ok(user_id) => {
            info!(user_id, email = %user.email, "Seeded user");
            report.users_inserted += 1;
        }
        Err(DatabaseError::Conflict { .. }) => {
            info!(email = %user.email, "User already present, skipping");
            report.users_skipped += 1;
        }
        Err(e) => return Err(e),
    }

    info!(
        galaxies = report.galaxies_inserted,
        users = report.users_inserted,
        "Database seeded"
    );
    Ok(report)
}
