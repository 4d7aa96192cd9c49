//! System settings handlers.
//!
//! Each handler delegates to the [`crate::config::SettingsFacade`] behind the
//! shared state and wraps the result in the success envelope. Authentication
//! has already happened in the middleware by the time these run.

use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use mediabay_config::{ProxySettings, SystemSettingsPatch, TgResourceUpdate};
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::http::errors::ApiError;
use crate::models::Envelope;
use crate::sessions::CurrentUser;
use crate::state::ApiState;

pub(crate) async fn get_system_config(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Envelope<Map<String, Value>>>, ApiError> {
    let config = state.settings.system_config().await.map_err(|err| {
        error!(error = %err, "failed to read system configuration");
        ApiError::internal("failed to read system configuration")
    })?;
    Ok(Json(Envelope::ok(config)))
}

pub(crate) async fn update_system_config(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<CurrentUser>,
    Json(patch): Json<SystemSettingsPatch>,
) -> Result<Json<Envelope<Map<String, Value>>>, ApiError> {
    info!(user = %user.username, "updating system configuration");
    let config = state.settings.update_system_config(patch).await.map_err(|err| {
        error!(error = %err, "failed to update system configuration");
        ApiError::internal("failed to update system configuration")
    })?;
    Ok(Json(Envelope::ok(config)))
}

pub(crate) async fn get_proxy_config(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Envelope<ProxySettings>>, ApiError> {
    let proxy = state.settings.proxy_config().await.map_err(|err| {
        error!(error = %err, "failed to read proxy configuration");
        ApiError::internal("failed to read proxy configuration")
    })?;
    Ok(Json(Envelope::ok(proxy)))
}

pub(crate) async fn update_proxy_config(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<CurrentUser>,
    Json(proxy): Json<ProxySettings>,
) -> Result<Json<Envelope<ProxySettings>>, ApiError> {
    info!(user = %user.username, "updating proxy configuration");
    let echoed = state.settings.update_proxy_config(proxy).await.map_err(|err| {
        error!(error = %err, "failed to update proxy configuration");
        ApiError::internal("failed to update proxy configuration")
    })?;
    Ok(Json(Envelope::ok(echoed)))
}

pub(crate) async fn get_tg_resource_config(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    let resource = state.settings.tg_resource_config().await.map_err(|err| {
        error!(error = %err, "failed to read telegram resource configuration");
        ApiError::internal("failed to read telegram resource configuration")
    })?;
    Ok(Json(Envelope::ok(resource)))
}

pub(crate) async fn update_tg_resource_config(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<CurrentUser>,
    Json(update): Json<TgResourceUpdate>,
) -> Result<Json<Envelope<()>>, ApiError> {
    info!(user = %user.username, "updating telegram resource configuration");
    state
        .settings
        .update_tg_resource_config(update)
        .await
        .map_err(|err| {
            error!(error = %err, "failed to update telegram resource configuration");
            ApiError::internal("failed to update telegram resource configuration")
        })?;
    Ok(Json(Envelope::ok(())))
}
