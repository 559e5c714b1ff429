//! Blogicum Server - server-rendered blog built on axum.

pub mod config;
pub mod error;
pub mod forms;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
