//! # api-adapters
//!
//! The HTTP surface of Rusty-Press (feature `web-axum`). Handlers are thin:
//! they extract the caller's identity and inputs, call into `services`, and
//! map `AppError` to a status code with an `{"error": ...}` body.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod metrics;
#[cfg(feature = "web-axum")]
pub mod routes;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use routes::{build_router, HttpOptions};
#[cfg(feature = "web-axum")]
pub use state::AppState;
