//! Configuration modules, each loaded from environment variables.
//!
//! - [`cors`]: allowed origins for the browser UI
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: session token secret and expiry

pub mod cors;
pub mod database;
pub mod jwt;
