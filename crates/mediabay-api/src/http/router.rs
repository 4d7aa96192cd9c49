//! Router construction and server host for the settings API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::Request, middleware, routing::get};
use mediabay_config::SettingsService;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::config::SharedSettings;
use crate::http::auth::require_session;
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::health::health;
use crate::http::settings::{
    get_proxy_config, get_system_config, get_tg_resource_config, update_proxy_config,
    update_system_config, update_tg_resource_config,
};
use crate::sessions::UserSessions;
use crate::state::ApiState;

/// Failures while binding or serving the HTTP listener.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// The listener could not be bound to the requested address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying bind failure.
        source: std::io::Error,
    },
    /// The accept loop terminated with an I/O error.
    #[error("server terminated: {source}")]
    Serve {
        /// Underlying serve failure.
        source: std::io::Error,
    },
}

/// Axum router wrapper that hosts the settings API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the server with its collaborators wired through shared state.
    #[must_use]
    pub fn new(settings: SettingsService, sessions: Arc<dyn UserSessions>) -> Self {
        Self::with_dependencies(Arc::new(settings), sessions)
    }

    pub(crate) fn with_dependencies(
        settings: SharedSettings,
        sessions: Arc<dyn UserSessions>,
    ) -> Self {
        let state = Arc::new(ApiState::new(settings, sessions));

        // Browser clients call from arbitrary origins; credentials travel in
        // the Authorization header, not cookies, so the surface stays fully
        // permissive.
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let method = request.method().clone();
                let uri_path = request.uri().path();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %method,
                    route = %uri_path,
                    request_id = %request_id,
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(trace_layer);

        let router = Self::build_router(&state)
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    fn build_router(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        let require_auth = middleware::from_fn_with_state(state.clone(), require_session);

        Router::new()
            .route("/health", get(health))
            .route(
                "/sysSetting/config",
                get(get_system_config)
                    .put(update_system_config)
                    .route_layer(require_auth.clone()),
            )
            .route(
                "/sysSetting/proxy/config",
                get(get_proxy_config)
                    .put(update_proxy_config)
                    .route_layer(require_auth.clone()),
            )
            .route(
                "/sysSetting/tg-resource/config",
                get(get_tg_resource_config)
                    .put(update_tg_resource_config)
                    .route_layer(require_auth),
            )
    }

    /// Bind the listener and run the accept loop until the process stops.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the accept loop
    /// fails.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), ApiServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        tracing::info!(%addr, "settings api listening");
        axum::serve(listener, self.router)
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }

    #[cfg(test)]
    pub(crate) fn router(self) -> Router {
        self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsFacade;
    use crate::models::Envelope;
    use crate::sessions::CurrentUser;
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use mediabay_config::{ProxySettings, SystemSettingsPatch, TgResourceUpdate};
    use serde_json::{Map, Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Counts every store access so tests can assert that rejected requests
    /// never touch the settings layer.
    #[derive(Default)]
    struct CountingSettings {
        calls: AtomicUsize,
    }

    impl CountingSettings {
        fn touch(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SettingsFacade for CountingSettings {
        async fn system_config(&self) -> Result<Map<String, Value>> {
            self.touch();
            Ok(Map::new())
        }
        async fn update_system_config(
            &self,
            _patch: SystemSettingsPatch,
        ) -> Result<Map<String, Value>> {
            self.touch();
            Ok(Map::new())
        }
        async fn proxy_config(&self) -> Result<ProxySettings> {
            self.touch();
            Ok(ProxySettings {
                use_proxy: false,
                proxy_host: String::new(),
                proxy_port: String::new(),
                proxy_username: String::new(),
                proxy_password: String::new(),
            })
        }
        async fn update_proxy_config(&self, config: ProxySettings) -> Result<ProxySettings> {
            self.touch();
            Ok(config)
        }
        async fn tg_resource_config(&self) -> Result<Value> {
            self.touch();
            Ok(Value::Object(Map::new()))
        }
        async fn update_tg_resource_config(&self, _update: TgResourceUpdate) -> Result<()> {
            self.touch();
            Ok(())
        }
    }

    /// Accepts exactly one token, "valid-token", as the admin user.
    struct FixedSessions;

    #[async_trait]
    impl crate::sessions::UserSessions for FixedSessions {
        async fn authenticate(&self, token: &str) -> Result<Option<CurrentUser>> {
            if token == "valid-token" {
                Ok(Some(CurrentUser {
                    username: "admin".to_string(),
                }))
            } else {
                Ok(None)
            }
        }
    }

    fn server(settings: Arc<CountingSettings>) -> Router {
        ApiServer::with_dependencies(settings, Arc::new(FixedSessions)).router()
    }

    fn get_request(uri: &str, token: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn health_is_reachable_without_credentials() {
        let router = server(Arc::new(CountingSettings::default()));
        let response = router
            .oneshot(get_request("/health", None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unauthenticated_requests_never_reach_the_store() {
        let settings = Arc::new(CountingSettings::default());
        let router = server(settings.clone());

        for uri in [
            "/sysSetting/config",
            "/sysSetting/proxy/config",
            "/sysSetting/tg-resource/config",
        ] {
            let response = router
                .clone()
                .oneshot(get_request(uri, None))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri {uri}");
        }

        assert_eq!(settings.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn preflight_allows_arbitrary_headers() {
        let router = server(Arc::new(CountingSettings::default()));
        let request = HttpRequest::builder()
            .method("OPTIONS")
            .uri("/sysSetting/config")
            .header(header::ORIGIN, "http://app.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .header(
                header::ACCESS_CONTROL_REQUEST_HEADERS,
                "authorization,x-custom",
            )
            .body(Body::empty())
            .expect("request");

        let response = router.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn invalid_token_is_rejected() {
        let settings = Arc::new(CountingSettings::default());
        let router = server(settings.clone());
        let response = router
            .oneshot(get_request("/sysSetting/config", Some("wrong")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(settings.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let settings = Arc::new(CountingSettings::default());
        let router = server(settings.clone());
        let request = HttpRequest::builder()
            .method("GET")
            .uri("/sysSetting/config")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .expect("request");
        let response = router.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(settings.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authenticated_get_returns_enveloped_payload() {
        let settings = Arc::new(CountingSettings::default());
        let router = server(settings.clone());
        let response = router
            .oneshot(get_request("/sysSetting/config", Some("valid-token")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let envelope: Envelope<Value> = serde_json::from_slice(&body).expect("envelope");
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.message, "success");
        assert_eq!(envelope.data, json!({}));
        assert_eq!(settings.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn authenticated_put_round_trips_the_proxy_body() {
        let settings = Arc::new(CountingSettings::default());
        let router = server(settings);
        let proxy = json!({
            "use_proxy": true,
            "proxy_host": "127.0.0.1",
            "proxy_port": "7890",
            "proxy_username": "",
            "proxy_password": ""
        });
        let request = HttpRequest::builder()
            .method("PUT")
            .uri("/sysSetting/proxy/config")
            .header(header::AUTHORIZATION, "Bearer valid-token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(proxy.to_string()))
            .expect("request");

        let response = router.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let envelope: Envelope<Value> = serde_json::from_slice(&body).expect("envelope");
        assert_eq!(envelope.data, proxy);
    }
}
