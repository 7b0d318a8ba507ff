//! Feature modules, one directory per resource.
//!
//! Each module follows the same layout: `model` (entities and DTOs),
//! `service` (database logic), `controller` (axum handlers), `router`
//! (route table). Modules talk to each other through their models and
//! services only.

pub mod admins;
pub mod auth;
pub mod channels;
pub mod departments;
pub mod events;
pub mod faculties;
pub mod levels;
pub mod posts;
pub mod timetables;
pub mod users;
