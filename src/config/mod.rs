//! Configuration modules for the Campusboard API.
//!
//! Each submodule handles a specific aspect of configuration, typically
//! loaded from environment variables:
//!
//! - [`auth`]: Power-admin bootstrap settings
//! - [`cors`]: CORS allowed origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: Email/SMTP settings for notifications
//! - [`jwt`]: JWT authentication settings

pub mod auth;
pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
