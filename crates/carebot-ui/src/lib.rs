//! Carebot UI crate - the embedded consultation page.
//!
//! The page is a single HTML file with its CSS and JavaScript inlined,
//! embedded at compile time so the binary serves it without touching disk.
//!
//! ```rust,ignore
//! use carebot_ui::page::CONSULT_HTML;
//!
//! async fn index() -> axum::response::Html<&'static str> {
//!     axum::response::Html(CONSULT_HTML)
//! }
//! ```

pub mod page;

pub use page::CONSULT_HTML;
