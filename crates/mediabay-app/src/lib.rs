#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Mediabay application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (environment loading and service wiring),
//! `sessions.rs` (JWT session validation), `error.rs` (application errors).

/// Application bootstrap and environment loading.
pub mod bootstrap;
/// Application-level error types.
pub mod error;
/// JWT-backed session validation.
pub mod sessions;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
pub use sessions::JwtSessions;
