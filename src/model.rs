//! Record types for users and galaxies.
//!
//! Field declaration order is the serialized field order, so responses list
//! columns exactly as the tables declare them.

use serde::{Deserialize, Serialize};

/// A registered user.
///
/// The password is stored and serialized verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Attributes of a user about to be registered.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// A persisted galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Galaxy {
    pub galaxy_id: i64,
    pub galaxy_name: String,
    pub galaxy_type: String,
    pub home_star: String,
    pub mass: f64,
    pub distance: f64,
}

/// Every galaxy attribute except the id; used for inserts and full replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyFields {
    pub galaxy_name: String,
    pub galaxy_type: String,
    pub home_star: String,
    pub mass: f64,
    pub distance: f64,
}

impl GalaxyFields {
    pub fn new(
        galaxy_name: impl Into<String>,
        galaxy_type: impl Into<String>,
        home_star: impl Into<String>,
        mass: f64,
        distance: f64,
    ) -> Self {
        Self {
            galaxy_name: galaxy_name.into(),
            galaxy_type: galaxy_type.into(),
            home_star: home_star.into(),
            mass,
            distance,
        }
    }

    /// Attach a store-assigned id.
    pub fn into_galaxy(self, galaxy_id: i64) -> Galaxy {
        Galaxy {
            galaxy_id,
            galaxy_name: self.galaxy_name,
            galaxy_type: self.galaxy_type,
            home_star: self.home_star,
            mass: self.mass,
            distance: self.distance,
        }
    }
}
