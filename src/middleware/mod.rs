//! Middleware modules for request processing.
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. [`auth::AuthUser`] validates the JWT and extracts claims
//! 3. Handlers load the actor's current database row for authorization
//!    decisions, so role changes take effect without re-issuing tokens
//!
//! Scope-aware authorization lives in [`crate::authz`]; the extractors here
//! only establish identity.

pub mod auth;
