//! bonechat API crate - axum HTTP server and route handlers.
//!
//! Exposes the conversation engine over REST: create sessions, submit
//! images and text, and read transcripts back for display.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
