//! Facade trait that decouples HTTP handlers from the concrete settings
//! service, so tests can substitute a stub without a real store behind it.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use mediabay_config::{
    ProxySettings, SettingsService, SystemSettingsPatch, TgResourceUpdate,
};
use serde_json::{Map, Value};

/// Configuration operations the HTTP layer depends on.
#[async_trait]
pub trait SettingsFacade: Send + Sync {
    /// Full configuration snapshot.
    async fn system_config(&self) -> Result<Map<String, Value>>;
    /// Merge the present fields of the patch and return the updated snapshot.
    async fn update_system_config(&self, patch: SystemSettingsPatch)
    -> Result<Map<String, Value>>;
    /// Proxy projection with defaults.
    async fn proxy_config(&self) -> Result<ProxySettings>;
    /// Full write of the proxy sub-object; echoes the input.
    async fn update_proxy_config(&self, config: ProxySettings) -> Result<ProxySettings>;
    /// The `tg_resource` object, or `{}` when absent.
    async fn tg_resource_config(&self) -> Result<Value>;
    /// Replace channel list and/or pattern map under `tg_resource`.
    async fn update_tg_resource_config(&self, update: TgResourceUpdate) -> Result<()>;
}

pub(crate) type SharedSettings = Arc<dyn SettingsFacade>;

#[async_trait]
impl SettingsFacade for SettingsService {
    async fn system_config(&self) -> Result<Map<String, Value>> {
        Self::system_config(self).await
    }

    async fn update_system_config(
        &self,
        patch: SystemSettingsPatch,
    ) -> Result<Map<String, Value>> {
        Self::update_system_config(self, patch).await
    }

    async fn proxy_config(&self) -> Result<ProxySettings> {
        Self::proxy_config(self).await
    }

    async fn update_proxy_config(&self, config: ProxySettings) -> Result<ProxySettings> {
        Self::update_proxy_config(self, config).await
    }

    async fn tg_resource_config(&self) -> Result<Value> {
        Self::tg_resource_config(self).await
    }

    async fn update_tg_resource_config(&self, update: TgResourceUpdate) -> Result<()> {
        Self::update_tg_resource_config(self, update).await
    }
}
