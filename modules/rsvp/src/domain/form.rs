//! Submit lifecycle of the guest form.

use chrono::{DateTime, Duration, Utc};

use crate::contract::model::{Language, NewGuestResponse};
use crate::domain::selection::SelectionState;

/// How long the confirmation stays visible before the form reappears.
pub const SUCCESS_REVERT_SECS: i64 = 5;

/// Everything typed into the form so far.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub first_name: String,
    pub last_name: String,
    pub notes: String,
    pub language: Language,
    pub selection: SelectionState,
}

impl Draft {
    pub fn has_names(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.last_name.trim().is_empty()
    }

    fn to_submission(&self) -> NewGuestResponse {
        NewGuestResponse {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            notes: (!self.notes.is_empty()).then(|| self.notes.clone()),
            language: self.language,
            selection: self.selection.selection().clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success { since: DateTime<Utc> },
    Error,
}

#[derive(Debug, Clone)]
pub struct IntakeForm {
    pub draft: Draft,
    status: SubmitStatus,
    success_revert: Duration,
}

impl Default for IntakeForm {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl IntakeForm {
    pub fn new(language: Language) -> Self {
        Self {
            draft: Draft {
                language,
                ..Draft::default()
            },
            status: SubmitStatus::Idle,
            success_revert: Duration::seconds(SUCCESS_REVERT_SECS),
        }
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// Payload to send, or `None` while names are missing or a submission
    /// is already in flight.
    pub fn begin_submit(&mut self) -> Option<NewGuestResponse> {
        if self.status == SubmitStatus::Submitting || !self.draft.has_names() {
            return None;
        }
        self.status = SubmitStatus::Submitting;
        Some(self.draft.to_submission())
    }

    /// Stored: clear the draft, keeping the chosen language.
    pub fn complete_ok(&mut self, now: DateTime<Utc>) {
        self.draft = Draft {
            language: self.draft.language,
            ..Draft::default()
        };
        self.status = SubmitStatus::Success { since: now };
    }

    /// Store refused the write; the draft stays for a retry.
    pub fn complete_err(&mut self) {
        self.status = SubmitStatus::Error;
    }

    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let SubmitStatus::Success { since } = self.status {
            if now - since >= self.success_revert {
                self.status = SubmitStatus::Idle;
            }
        }
    }

    /// "Send another response" before the timer fires.
    pub fn dismiss(&mut self) {
        if matches!(self.status, SubmitStatus::Success { .. }) {
            self.status = SubmitStatus::Idle;
        }
    }
}
