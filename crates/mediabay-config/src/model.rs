//! Typed settings payloads exchanged with the store.
//!
//! # Design
//! - Pure data carriers; merge mechanics live in `service.rs`.
//! - JSON key casing mirrors the persisted document (`tianyiAccount`,
//!   `cloudPatterns`), so serialized forms can be merged verbatim.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};

/// Partial update for the top-level system settings.
///
/// Every field is optional. Absent fields are left untouched in the store;
/// to clear a value a caller must send an explicit empty string or `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSettingsPatch {
    /// Emby server base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emby_url: Option<String>,
    /// Emby API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emby_api_key: Option<String>,
    /// Alist server base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alist_url: Option<String>,
    /// Alist API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alist_api_key: Option<String>,
    /// Tianyi cloud-drive account.
    #[serde(rename = "tianyiAccount", skip_serializing_if = "Option::is_none")]
    pub tianyi_account: Option<String>,
    /// Tianyi cloud-drive password.
    #[serde(rename = "tianyiPassword", skip_serializing_if = "Option::is_none")]
    pub tianyi_password: Option<String>,
    /// Quark cloud-drive session cookie.
    #[serde(rename = "quarkCookie", skip_serializing_if = "Option::is_none")]
    pub quark_cookie: Option<String>,
    /// Whether outbound requests should use the proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_proxy: Option<bool>,
    /// Proxy host name or address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_host: Option<String>,
    /// Proxy TCP port, kept as a string like the rest of the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_port: Option<String>,
    /// Proxy username, empty string when unused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_username: Option<String>,
    /// Proxy password, empty string when unused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_password: Option<String>,
}

impl SystemSettingsPatch {
    /// Reduce the patch to a partial map containing only the fields present
    /// in the request, ready for a shallow merge.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch cannot be serialized.
    pub fn into_partial(self) -> ConfigResult<Map<String, Value>> {
        to_partial("patch.serialize", &self)
    }
}

/// Outbound proxy configuration.
///
/// Unlike [`SystemSettingsPatch`] every field is required: updates always
/// write all five keys, even when a value is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    /// Whether outbound requests should use the proxy.
    pub use_proxy: bool,
    /// Proxy host name or address.
    pub proxy_host: String,
    /// Proxy TCP port, kept as a string like the rest of the document.
    pub proxy_port: String,
    /// Proxy username, empty string when unused.
    pub proxy_username: String,
    /// Proxy password, empty string when unused.
    pub proxy_password: String,
}

impl ProxySettings {
    /// Project the five proxy fields out of a configuration snapshot,
    /// defaulting missing keys to `false`/empty string.
    #[must_use]
    pub fn project(config: &Map<String, Value>) -> Self {
        Self {
            use_proxy: config
                .get("use_proxy")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            proxy_host: string_field(config, "proxy_host"),
            proxy_port: string_field(config, "proxy_port"),
            proxy_username: string_field(config, "proxy_username"),
            proxy_password: string_field(config, "proxy_password"),
        }
    }

    /// Render the proxy settings as a partial map for a merge write.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized.
    pub fn to_partial(&self) -> ConfigResult<Map<String, Value>> {
        to_partial("proxy.serialize", self)
    }
}

/// A Telegram channel entry under `tg_resource.telegram.channels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TgChannel {
    /// Channel identifier as it appears in channel URLs.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Partial update for the Telegram resource configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TgResourceUpdate {
    /// Replacement channel list; `None` leaves the stored list untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<TgChannel>>,
    /// Replacement cloud-link pattern map, applied as a full replace; keys
    /// absent from the new map are discarded. Insertion order is kept so
    /// the stored document lists patterns in the order they were submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<IndexMap<String, String>>,
}

fn to_partial<T: Serialize>(operation: &'static str, payload: &T) -> ConfigResult<Map<String, Value>> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigError::Malformed),
        Err(source) => Err(ConfigError::Persist { operation, source }),
    }
}

fn string_field(config: &Map<String, Value>, key: &str) -> String {
    config
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = SystemSettingsPatch {
            emby_url: Some("http://emby.local".to_string()),
            use_proxy: Some(true),
            ..SystemSettingsPatch::default()
        };

        let partial = patch.into_partial().expect("partial");
        assert_eq!(partial.len(), 2);
        assert_eq!(partial["emby_url"], json!("http://emby.local"));
        assert_eq!(partial["use_proxy"], json!(true));
    }

    #[test]
    fn patch_round_trips_renamed_keys() {
        let patch: SystemSettingsPatch = serde_json::from_value(json!({
            "tianyiAccount": "user",
            "quarkCookie": "cookie"
        }))
        .expect("deserialize");
        assert_eq!(patch.tianyi_account.as_deref(), Some("user"));
        assert_eq!(patch.quark_cookie.as_deref(), Some("cookie"));

        let partial = patch.into_partial().expect("partial");
        assert!(partial.contains_key("tianyiAccount"));
        assert!(partial.contains_key("quarkCookie"));
    }

    #[test]
    fn empty_patch_produces_empty_partial() {
        let partial = SystemSettingsPatch::default()
            .into_partial()
            .expect("partial");
        assert!(partial.is_empty());
    }

    #[test]
    fn proxy_projection_defaults_missing_fields() {
        let projected = ProxySettings::project(&Map::new());
        assert_eq!(
            projected,
            ProxySettings {
                use_proxy: false,
                proxy_host: String::new(),
                proxy_port: String::new(),
                proxy_username: String::new(),
                proxy_password: String::new(),
            }
        );
    }

    #[test]
    fn proxy_partial_always_contains_all_five_keys() {
        let proxy = ProxySettings {
            use_proxy: false,
            proxy_host: String::new(),
            proxy_port: String::new(),
            proxy_username: String::new(),
            proxy_password: String::new(),
        };
        let partial = proxy.to_partial().expect("partial");
        assert_eq!(partial.len(), 5);
        assert_eq!(partial["use_proxy"], json!(false));
        assert_eq!(partial["proxy_host"], json!(""));
    }

    #[test]
    fn proxy_deserialize_rejects_missing_fields() {
        let result: Result<ProxySettings, _> =
            serde_json::from_value(json!({"use_proxy": true}));
        assert!(result.is_err(), "all five proxy fields are required");
    }
}
