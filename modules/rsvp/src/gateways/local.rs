use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::RsvpApi,
    error::RsvpError,
    model::{GuestResponse, NewGuestResponse},
};
use crate::domain::{error::DomainError, service::Service};

/// In-process [`RsvpApi`] backed by the domain service.
pub struct RsvpLocalClient {
    service: Arc<Service>,
}

impl RsvpLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RsvpApi for RsvpLocalClient {
    async fn submit(&self, new: NewGuestResponse) -> Result<GuestResponse, RsvpError> {
        self.service.submit(new).await.map_err(map_domain_error)
    }

    async fn list_responses(
        &self,
        search: Option<String>,
    ) -> Result<Vec<GuestResponse>, RsvpError> {
        self.service
            .list(search.as_deref())
            .await
            .map_err(map_domain_error)
    }

    async fn get_response(&self, id: Uuid) -> Result<GuestResponse, RsvpError> {
        self.service.get(id).await.map_err(map_domain_error)
    }

    async fn delete_response(&self, id: Uuid) -> Result<(), RsvpError> {
        self.service.delete(id).await.map_err(map_domain_error)
    }
}

fn map_domain_error(e: DomainError) -> RsvpError {
    match e {
        DomainError::EmptyName { .. } | DomainError::Validation { .. } => {
            RsvpError::validation(e.to_string())
        }
        DomainError::NotFound { id } => RsvpError::not_found(id),
        DomainError::Unauthorized => RsvpError::Unauthorized,
        DomainError::StoreUnavailable { .. } => RsvpError::Unavailable,
        DomainError::ReportFailed { .. } => RsvpError::Internal,
    }
}
