//! Typed request bodies, parsed from raw fields before any handler runs.

use super::error::ApiError;
use super::extract::{FormFields, FromFields};
use crate::model::{GalaxyFields, NewUser};

/// `POST /register`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterForm(pub NewUser);

impl FromFields for RegisterForm {
    fn from_fields(fields: &FormFields) -> Result<Self, ApiError> {
        Ok(Self(NewUser {
            email: fields.required_string("email")?,
            first_name: fields.required_string("first_name")?,
            last_name: fields.required_string("last_name")?,
            password: fields.required_string("password")?,
        }))
    }
}

/// `POST /login`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl FromFields for LoginForm {
    fn from_fields(fields: &FormFields) -> Result<Self, ApiError> {
        Ok(Self {
            email: fields.required_string("email")?,
            password: fields.required_string("password")?,
        })
    }
}

/// `POST /add_galaxy`.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyForm(pub GalaxyFields);

impl FromFields for GalaxyForm {
    fn from_fields(fields: &FormFields) -> Result<Self, ApiError> {
        galaxy_fields(fields).map(Self)
    }
}

/// `PUT /update_galaxy`: the id plus a full replacement of every attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyUpdateForm {
    pub galaxy_id: i64,
    pub fields: GalaxyFields,
}

impl FromFields for GalaxyUpdateForm {
    fn from_fields(fields: &FormFields) -> Result<Self, ApiError> {
        Ok(Self {
            galaxy_id: fields.required_i64("galaxy_id")?,
            fields: galaxy_fields(fields)?,
        })
    }
}

/// `GET /parameters?name=&age=`.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeQuery {
    pub name: Option<String>,
    pub age: i64,
}

impl FromFields for AgeQuery {
    fn from_fields(fields: &FormFields) -> Result<Self, ApiError> {
        Ok(Self {
            name: fields.optional("name").map(str::to_string),
            age: fields.required_i64("age")?,
        })
    }
}

fn galaxy_fields(fields: &FormFields) -> Result<GalaxyFields, ApiError> {
    Ok(GalaxyFields {
        galaxy_name: fields.required_string("galaxy_name")?,
        galaxy_type: fields.required_string("galaxy_type")?,
        home_star: fields.required_string("home_star")?,
        mass: fields.required_f64("mass")?,
        distance: fields.required_f64("distance")?,
    })
}
