use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{GuestResponse, Language, NewGuestResponse};
use crate::domain::admin_view::matches_search;
use crate::domain::error::DomainError;
use crate::domain::ports::ReportRenderer;
use crate::domain::repo::ResponsesRepository;
use crate::domain::report::{build_report, Report};
use crate::domain::selection::flatten;
use crate::domain::venue::Venue;

/// Runtime settings of the domain service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub none_sentinel: String,
    pub default_language: Language,
    pub admin_username: String,
    pub admin_password: String,
    pub report_filename: String,
    pub venues: Vec<Venue>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            none_sentinel: "Nessuna".to_string(),
            default_language: Language::It,
            admin_username: "cla&ago".to_string(),
            admin_password: "29082026".to_string(),
            report_filename: "report_matrimonio.pdf".to_string(),
            venues: Vec::new(),
        }
    }
}

/// RSVP intake and admin reporting.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ResponsesRepository>,
    renderer: Arc<dyn ReportRenderer>,
    config: ServiceConfig,
}

impl Service {
    pub fn new(
        repo: Arc<dyn ResponsesRepository>,
        renderer: Arc<dyn ReportRenderer>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            renderer,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[instrument(
        name = "rsvp.service.submit",
        skip(self, new),
        fields(language = %new.language)
    )]
    pub async fn submit(&self, new: NewGuestResponse) -> Result<GuestResponse, DomainError> {
        let first_name = new.first_name.trim();
        let last_name = new.last_name.trim();
        if first_name.is_empty() {
            return Err(DomainError::empty_name("first_name"));
        }
        if last_name.is_empty() {
            return Err(DomainError::empty_name("last_name"));
        }

        let diet = flatten(&new.selection, new.language, &self.config.none_sentinel);
        let record = GuestResponse {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            intolerances: diet.intolerances,
            allergies: diet.allergies,
            notes: new.notes.unwrap_or_default(),
            submitted_at: Utc::now(),
            language: new.language,
        };

        self.repo
            .insert(record.clone())
            .await
            .map_err(DomainError::store)?;

        info!(response_id = %record.id, "Stored guest response");
        Ok(record)
    }

    /// All responses, newest first, optionally narrowed by name.
    #[instrument(name = "rsvp.service.list", skip(self))]
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<GuestResponse>, DomainError> {
        let mut records = self
            .repo
            .list_newest_first()
            .await
            .map_err(DomainError::store)?;

        if let Some(term) = search {
            records.retain(|r| matches_search(r, term));
        }
        debug!(count = records.len(), "Listed guest responses");
        Ok(records)
    }

    #[instrument(name = "rsvp.service.get", skip(self), fields(response_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<GuestResponse, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(DomainError::store)?
            .ok_or_else(|| DomainError::not_found(id))
    }

    #[instrument(name = "rsvp.service.delete", skip(self), fields(response_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = self.repo.delete(id).await.map_err(DomainError::store)?;
        if !deleted {
            return Err(DomainError::not_found(id));
        }
        info!("Deleted guest response");
        Ok(())
    }

    #[instrument(name = "rsvp.service.report", skip(self))]
    pub async fn report(&self, now: DateTime<Utc>) -> Result<Report, DomainError> {
        let records = self
            .repo
            .list_newest_first()
            .await
            .map_err(DomainError::store)?;
        Ok(build_report(&records, &self.config.none_sentinel, now))
    }

    /// Rendered report document.
    #[instrument(name = "rsvp.service.export_report", skip(self))]
    pub async fn export_report(&self, now: DateTime<Utc>) -> Result<Vec<u8>, DomainError> {
        let report = self.report(now).await?;
        let bytes = self.renderer.render(&report).map_err(DomainError::report)?;
        info!(
            rows = report.rows.len(),
            bytes = bytes.len(),
            "Rendered report"
        );
        Ok(bytes)
    }

    pub fn report_content_type(&self) -> &'static str {
        self.renderer.content_type()
    }

    /// Plain comparison against the single configured pair.
    pub fn verify_admin(&self, username: &str, password: &str) -> Result<(), DomainError> {
        if username == self.config.admin_username && password == self.config.admin_password {
            Ok(())
        } else {
            warn!("Rejected admin credentials");
            Err(DomainError::Unauthorized)
        }
    }

    pub fn venues(&self) -> &[Venue] {
        &self.config.venues
    }
}
