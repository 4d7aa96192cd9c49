//! Environment loading and service wiring for the binary entrypoint.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use mediabay_api::ApiServer;
use mediabay_config::{ConfigStore, SettingsService};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};
use crate::sessions::JwtSessions;

const DEFAULT_SETTINGS_PATH: &str = "data/settings.json";
const DEFAULT_HTTP_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Dependencies required to bootstrap the application.
pub(crate) struct BootstrapDependencies {
    settings_path: PathBuf,
    bind_addr: IpAddr,
    http_port: u16,
    jwt_secret: Vec<u8>,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment.
    pub(crate) fn from_env() -> AppResult<Self> {
        let settings_path = std::env::var("MEDIABAY_SETTINGS_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH), PathBuf::from);

        let bind_addr = match std::env::var("MEDIABAY_BIND_ADDR") {
            Ok(raw) => raw.parse().map_err(|_| AppError::InvalidConfig {
                field: "MEDIABAY_BIND_ADDR",
                reason: "not_an_ip_address",
                value: Some(raw),
            })?,
            Err(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let http_port = match std::env::var("MEDIABAY_HTTP_PORT") {
            Ok(raw) => {
                let port: u16 = raw.parse().map_err(|_| AppError::InvalidConfig {
                    field: "MEDIABAY_HTTP_PORT",
                    reason: "not_a_port",
                    value: Some(raw.clone()),
                })?;
                if port == 0 {
                    return Err(AppError::InvalidConfig {
                        field: "MEDIABAY_HTTP_PORT",
                        reason: "zero",
                        value: Some(raw),
                    });
                }
                port
            }
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let jwt_secret = std::env::var("MEDIABAY_JWT_SECRET")
            .map_err(|_| AppError::MissingEnv {
                name: "MEDIABAY_JWT_SECRET",
            })?
            .into_bytes();

        Ok(Self {
            settings_path,
            bind_addr,
            http_port,
            jwt_secret,
        })
    }
}

/// Entry point for the application boot sequence.
///
/// # Errors
///
/// Returns an error if dependency construction or application startup fails.
pub async fn run_app() -> AppResult<()> {
    init_logging();
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify
/// testing.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    info!("Mediabay application bootstrap starting");

    let BootstrapDependencies {
        settings_path,
        bind_addr,
        http_port,
        jwt_secret,
    } = dependencies;

    let store = ConfigStore::open(settings_path)
        .await
        .map_err(|err| AppError::config("config_store.open", err))?;
    let settings = SettingsService::new(Arc::new(store));
    let sessions = Arc::new(JwtSessions::new(&jwt_secret));

    let api = ApiServer::new(settings, sessions);
    let addr = SocketAddr::new(bind_addr, http_port);
    info!(addr = %addr, "Launching API listener");

    api.serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
