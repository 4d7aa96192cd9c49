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

//! File-backed configuration store for the Mediabay settings service.
//!
//! Layout: `model.rs` (typed settings payloads), `store.rs` (`SettingsStore`
//! trait + JSON file implementation), `service.rs` (`SettingsService` typed
//! operations), `error.rs` (`ConfigError`).

pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use error::{ConfigError, ConfigResult};
pub use model::{ProxySettings, SystemSettingsPatch, TgChannel, TgResourceUpdate};
pub use service::SettingsService;
pub use store::{ConfigStore, SettingsStore};
