//! Typed settings operations layered over a [`SettingsStore`].
//!
//! The service owns the merge semantics of each endpoint: which fields are
//! optional, which sub-objects are replaced wholesale, and which snapshot is
//! returned afterwards. The store below it only knows how to snapshot and
//! shallow-merge.

use std::sync::Arc;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::model::{ProxySettings, SystemSettingsPatch, TgResourceUpdate};
use crate::store::SettingsStore;

const TG_RESOURCE: &str = "tg_resource";
const TELEGRAM: &str = "telegram";
const CHANNELS: &str = "channels";
const CLOUD_PATTERNS: &str = "cloudPatterns";

/// Typed facade over the configuration store.
///
/// The store is injected so tests can substitute an in-memory fake; nothing
/// in this crate holds process-global state.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
}

impl SettingsService {
    /// Wrap a settings store.
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Full configuration snapshot, secrets included.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn system_config(&self) -> Result<Map<String, Value>> {
        self.store.snapshot().await
    }

    /// Merge the present fields of `patch` into the store and return the
    /// updated snapshot. Fields absent from the patch are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub async fn update_system_config(
        &self,
        patch: SystemSettingsPatch,
    ) -> Result<Map<String, Value>> {
        self.store.merge(patch.into_partial()?).await?;
        self.store.snapshot().await
    }

    /// Five-field proxy projection with defaults for missing keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn proxy_config(&self) -> Result<ProxySettings> {
        let config = self.store.snapshot().await?;
        Ok(ProxySettings::project(&config))
    }

    /// Write all five proxy fields and echo the submitted value back.
    ///
    /// The echo is the input, not a re-read: callers trust the merge
    /// succeeded once this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub async fn update_proxy_config(&self, config: ProxySettings) -> Result<ProxySettings> {
        self.store.merge(config.to_partial()?).await?;
        Ok(config)
    }

    /// The stored `tg_resource` object, or `{}` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn tg_resource_config(&self) -> Result<Value> {
        let mut config = self.store.snapshot().await?;
        Ok(config
            .remove(TG_RESOURCE)
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    /// Apply channel and/or pattern replacements to `tg_resource`.
    ///
    /// A provided channel list replaces `telegram.channels` wholesale; a
    /// missing `telegram` object is initialized on the first write. A
    /// provided pattern map replaces the entire `cloudPatterns` object.
    /// Absent fields leave their sub-section untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub async fn update_tg_resource_config(&self, update: TgResourceUpdate) -> Result<()> {
        let mut config = self.store.snapshot().await?;
        let mut tg = match config.remove(TG_RESOURCE) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        if let Some(channels) = update.channels {
            let telegram = ensure_object(&mut tg, TELEGRAM);
            telegram.insert(CHANNELS.to_string(), serde_json::to_value(channels)?);
        }
        if let Some(patterns) = update.patterns {
            tg.insert(CLOUD_PATTERNS.to_string(), serde_json::to_value(patterns)?);
        }

        let mut partial = Map::new();
        partial.insert(TG_RESOURCE.to_string(), Value::Object(tg));
        self.store.merge(partial).await
    }
}

fn ensure_object<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(object) => object,
        _ => unreachable!("entry was just coerced to an object"),
    }
}
