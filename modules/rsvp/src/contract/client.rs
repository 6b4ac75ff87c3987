use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::error::RsvpError;
use crate::contract::model::{GuestResponse, NewGuestResponse};

/// In-process API of the rsvp module.
#[async_trait]
pub trait RsvpApi: Send + Sync {
    async fn submit(&self, new: NewGuestResponse) -> Result<GuestResponse, RsvpError>;

    /// Newest first; `search` filters on first or last name.
    async fn list_responses(&self, search: Option<String>)
        -> Result<Vec<GuestResponse>, RsvpError>;

    async fn get_response(&self, id: Uuid) -> Result<GuestResponse, RsvpError>;

    async fn delete_response(&self, id: Uuid) -> Result<(), RsvpError>;
}
