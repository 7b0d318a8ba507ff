pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_comments_router, init_posts_router};
