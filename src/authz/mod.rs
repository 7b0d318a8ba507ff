//! Scope-aware authorization for posts, channels, and role management.
//!
//! The engine is split in two layers:
//!
//! - [`engine`]: pure decision functions over already-resolved snapshots.
//!   Every rule returns a typed [`engine::Access`] verdict with a stable
//!   deny reason; nothing in this layer touches the database.
//! - [`gate`]: async helpers that load the actor and resolve a target
//!   scope from the database, then delegate to the pure rules. Handlers
//!   call the gate; tests exercise the engine directly.
//!
//! Denials map to HTTP 403, a missing referenced entity (level, faculty,
//! actor) to 404, and a contradictory scope (both faculty and level set)
//! to 400 at the request boundary.

pub mod engine;
pub mod gate;

pub use engine::{Access, ActorSnapshot, PostScope, ScopeTarget};
