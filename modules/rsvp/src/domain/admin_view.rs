//! Organizer-side view over the fetched responses: search, detail and
//! confirmed deletion.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::client::RsvpApi;
use crate::contract::error::RsvpError;
use crate::contract::model::GuestResponse;
use crate::domain::report::{build_report, Report};

/// Shown when the store refuses a delete.
pub const DELETE_FAILED_MESSAGE: &str = "Errore durante l'eliminazione";

/// Case-insensitive substring match on first or last name. The term is used
/// as typed, whitespace included; an empty term matches everything.
pub fn matches_search(record: &GuestResponse, term: &str) -> bool {
    let term = term.to_lowercase();
    term.is_empty()
        || record.first_name.to_lowercase().contains(&term)
        || record.last_name.to_lowercase().contains(&term)
}

/// A delete waiting for the organizer's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: Uuid,
    pub prompt: String,
}

#[derive(Debug, Default)]
pub struct AdminView {
    records: Vec<GuestResponse>,
    search: String,
    open: Option<Uuid>,
    pending: Option<PendingDelete>,
}

impl AdminView {
    pub fn new(records: Vec<GuestResponse>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Replace the list with a fresh fetch. On failure the current list
    /// is kept and the error surfaced.
    pub async fn refresh(&mut self, api: &dyn RsvpApi) -> Result<usize, RsvpError> {
        self.records = api.list_responses(None).await?;
        if self
            .open
            .is_some_and(|id| !self.records.iter().any(|r| r.id == id))
        {
            self.open = None;
        }
        Ok(self.records.len())
    }

    pub fn records(&self) -> &[GuestResponse] {
        &self.records
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn filtered(&self) -> Vec<&GuestResponse> {
        self.records
            .iter()
            .filter(|r| matches_search(r, &self.search))
            .collect()
    }

    pub fn open_detail(&mut self, id: Uuid) -> Option<&GuestResponse> {
        let found = self.records.iter().find(|r| r.id == id)?;
        self.open = Some(found.id);
        Some(found)
    }

    pub fn detail(&self) -> Option<&GuestResponse> {
        let id = self.open?;
        self.records.iter().find(|r| r.id == id)
    }

    pub fn close_detail(&mut self) {
        self.open = None;
    }

    pub fn request_delete(&mut self, id: Uuid) -> Option<&PendingDelete> {
        let record = self.records.iter().find(|r| r.id == id)?;
        self.pending = Some(PendingDelete {
            id,
            prompt: format!(
                "Sei sicuro di voler eliminare la partecipazione di {}?",
                record.full_name()
            ),
        });
        self.pending.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending = None;
    }

    /// Issue the pending delete; the local list changes only after the
    /// store confirmed it.
    pub async fn confirm_delete(&mut self, api: &dyn RsvpApi) -> Result<Option<Uuid>, RsvpError> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        api.delete_response(pending.id).await?;

        self.records.retain(|r| r.id != pending.id);
        if self.open == Some(pending.id) {
            self.open = None;
        }
        Ok(Some(pending.id))
    }

    /// Report over every fetched record, regardless of the search term.
    pub fn report(&self, none_sentinel: &str, now: DateTime<Utc>) -> Report {
        build_report(&self.records, none_sentinel, now)
    }
}
