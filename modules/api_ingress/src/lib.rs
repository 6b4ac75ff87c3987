//! HTTP host: owns the listener, the shared middleware stack, health and
//! OpenAPI/doc routes. Feature modules hand in their own `Router`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::{ArcSwap, ArcSwapOption};
use axum::{middleware::from_fn, routing::get, Json, Router};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::OpenApi;

mod config;
pub mod problem;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub struct ApiIngress {
    config: ArcSwap<ApiIngressConfig>,
    openapi: ArcSwapOption<OpenApi>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    /// Key of this module's section under `modules:` in the config file.
    pub const NAME: &'static str = "api_ingress";

    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            openapi: ArcSwapOption::empty(),
        }
    }

    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    /// Document served at `/openapi.json`. Without one the route is absent.
    pub fn set_openapi(&self, doc: OpenApi) {
        self.openapi.store(Some(Arc::new(doc)));
    }

    /// Merge `api` under the host routes and wrap everything in the
    /// middleware stack.
    pub fn build_router(&self, api: Router) -> Router {
        let config = self.get_config();
        tracing::debug!(
            docs = config.enable_docs,
            cors = config.cors_enabled,
            "Building router"
        );

        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(api);

        if let Some(doc) = self.openapi.load_full() {
            // Serialized once; every request gets a clone of the same value.
            let body = serde_json::to_value(&*doc).unwrap_or_default();
            router = router.route(
                "/openapi.json",
                get(move || {
                    let body = body.clone();
                    async move { Json(body) }
                }),
            );
            if config.enable_docs {
                router = router.route("/docs", get(web::serve_docs));
            }
        }

        // Layers wrap from the inside out, so the last one added runs first:
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id -> Timeout -> CORS -> BodyLimit
        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));
        if config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_sec,
        )));
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));
        router = router.layer(request_id::create_trace_layer());

        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind `addr` (or the configured `bind_addr` when set) and serve until
    /// `cancel` fires.
    pub async fn serve(
        &self,
        router: Router,
        addr: SocketAddr,
        cancel: CancellationToken,
    ) -> Result<()> {
        let cfg = self.get_config();
        let addr = if cfg.bind_addr.trim().is_empty() {
            addr
        } else {
            cfg.bind_addr
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cfg.bind_addr, e))?
        };

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", listener.local_addr()?);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
