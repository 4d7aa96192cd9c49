//! HTTP settings facade for the Mediabay service.
//!
//! Layout: `http/` (router, middleware, handlers), `config.rs` (settings
//! facade trait), `sessions.rs` (authentication collaborator), `models.rs`
//! (response envelope and problem payloads).

pub mod config;
pub mod models;
pub mod sessions;

mod http;
mod state;

pub use config::SettingsFacade;
pub use http::router::{ApiServer, ApiServerError};
pub use models::{Envelope, ProblemDetails};
pub use sessions::{CurrentUser, UserSessions};
