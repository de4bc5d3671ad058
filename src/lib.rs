//! Galaxy API: a small JSON service for galaxies and users with bearer-token
//! protected writes.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod mail;
pub mod model;
pub mod seed;
pub mod server;
pub mod store;
