//! Carebot API crate - axum HTTP server and route handlers.
//!
//! Serves the consultation page and a small JSON API over the session
//! registry: create a session, send typed or spoken input, read the
//! transcript, and end the session.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
