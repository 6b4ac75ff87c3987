use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::GuestResponse;

/// Persistence port for guest responses. No update: records are
/// write-once.
#[async_trait]
pub trait ResponsesRepository: Send + Sync {
    /// Persist a fully-formed record (id and timestamp set by the service).
    async fn insert(&self, r: GuestResponse) -> anyhow::Result<()>;
    /// Every record, `submitted_at` descending, ties broken by id.
    async fn list_newest_first(&self) -> anyhow::Result<Vec<GuestResponse>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<GuestResponse>>;
    /// Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
