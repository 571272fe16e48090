//! # Edupanel API
//!
//! A REST backend for school and user administration, built with Axum and
//! PostgreSQL. Schools are identified by EIIN (a numeric business key);
//! users reference their school by EIIN and authenticate with email and
//! password to obtain a 30-minute session token.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── config/           # Environment-driven configuration
//! ├── middleware/       # Session extractor and route guard
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Credential login
//! │   ├── schools/     # School management
//! │   └── users/       # User management
//! └── utils/           # Errors, envelopes, password and token helpers
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `model.rs`: data models, DTOs, validation rules
//! - `service.rs`: business logic over the connection pool
//! - `controller.rs`: HTTP handlers
//! - `router.rs`: Axum router configuration
//!
//! ## Responses
//!
//! Every endpoint answers with a uniform envelope: successes as
//! `{success: true, data, message?, timestamp}`, failures as
//! `{success: false, error: {message, code}, message, timestamp}` with the
//! status code derived from the error kind (404 not-found, 409 conflicts,
//! 400 validation, 401 missing/invalid session, 500 otherwise).
//!
//! ## Deletion semantics
//!
//! Deleting a user means deactivating it; a separate `/permanent` route
//! removes the record. Deleting a school is permanent and deactivates the
//! users that reference it.

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
