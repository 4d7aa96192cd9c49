//! Shared application state threaded through the router.

use std::sync::Arc;

use crate::config::SharedSettings;
use crate::sessions::UserSessions;

pub(crate) struct ApiState {
    pub(crate) settings: SharedSettings,
    pub(crate) sessions: Arc<dyn UserSessions>,
}

impl ApiState {
    pub(crate) fn new(settings: SharedSettings, sessions: Arc<dyn UserSessions>) -> Self {
        Self { settings, sessions }
    }
}
