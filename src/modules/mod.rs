pub mod auth;
pub mod schools;
pub mod users;
