//! HTTP layer: router construction, middleware, and request handlers.

pub(crate) mod auth;
pub(crate) mod constants;
pub(crate) mod errors;
pub(crate) mod health;
pub(crate) mod router;
pub(crate) mod settings;
