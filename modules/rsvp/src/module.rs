use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::{openapi::ApiDoc, routes};
use crate::config::RsvpConfig;
use crate::contract::client::RsvpApi;
use crate::domain::service::Service;
use crate::gateways::local::RsvpLocalClient;
use crate::infra::report::PdfReportRenderer;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmResponsesRepository;

/// Wires storage, rendering and the domain service into one unit the
/// server mounts.
#[derive(Clone)]
pub struct RsvpModule {
    service: Arc<Service>,
}

impl RsvpModule {
    /// Key of this module's section under `modules:` in the config file.
    pub const NAME: &'static str = "rsvp";

    /// Bring the schema up to date.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        Migrator::up(db, None)
            .await
            .context("failed to run rsvp migrations")?;
        info!("rsvp migrations applied");
        Ok(())
    }

    pub fn new(db: DatabaseConnection, cfg: &RsvpConfig) -> anyhow::Result<Self> {
        let service_cfg = cfg.service_config()?;
        let repo = SeaOrmResponsesRepository::new(db);
        let renderer = PdfReportRenderer::new(cfg.report.title.clone());
        let service = Service::new(Arc::new(repo), Arc::new(renderer), service_cfg);

        info!(
            venues = service.venues().len(),
            default_language = %service.config().default_language,
            "rsvp module initialized"
        );
        Ok(Self {
            service: Arc::new(service),
        })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for callers that skip HTTP.
    pub fn client(&self) -> Arc<dyn RsvpApi> {
        Arc::new(RsvpLocalClient::new(self.service.clone()))
    }

    pub fn router(&self, router: Router) -> Router {
        routes::register_routes(router, self.service.clone())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        <ApiDoc as utoipa::OpenApi>::openapi()
    }
}
