//! Aggregate report over all stored responses.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::contract::model::GuestResponse;
use crate::domain::selection::is_empty_token;

/// Rendered for empty table cells.
pub const MISSING_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Occurrences of each distinct comma-separated token across `fields`,
/// in order of first appearance.
pub fn count_tokens<'a, I>(fields: I, none_sentinel: &str) -> Vec<TokenCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<TokenCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in fields.into_iter().flat_map(|f| f.split(',')).map(str::trim) {
        if is_empty_token(token, none_sentinel) {
            continue;
        }
        match index.get(token) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(token.to_string(), counts.len());
                counts.push(TokenCount {
                    token: token.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStats {
    pub total: usize,
    pub intolerances: Vec<TokenCount>,
    pub allergies: Vec<TokenCount>,
}

/// One table row, cells already substituted with [`MISSING_CELL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub first_name: String,
    pub last_name: String,
    pub intolerances: String,
    pub allergies: String,
    pub notes: String,
}

impl ReportRow {
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.first_name,
            &self.last_name,
            &self.intolerances,
            &self.allergies,
            &self.notes,
        ]
    }
}

fn cell(value: &str) -> String {
    if value.trim().is_empty() {
        MISSING_CELL.to_string()
    } else {
        value.to_string()
    }
}

impl From<&GuestResponse> for ReportRow {
    fn from(r: &GuestResponse) -> Self {
        Self {
            first_name: r.first_name.clone(),
            last_name: r.last_name.clone(),
            intolerances: cell(&r.intolerances),
            allergies: cell(&r.allergies),
            notes: cell(&r.notes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
    pub stats: ReportStats,
}

/// Always built from the full record set, never a filtered view.
pub fn build_report(
    records: &[GuestResponse],
    none_sentinel: &str,
    generated_at: DateTime<Utc>,
) -> Report {
    Report {
        generated_at,
        rows: records.iter().map(ReportRow::from).collect(),
        stats: ReportStats {
            total: records.len(),
            intolerances: count_tokens(
                records.iter().map(|r| r.intolerances.as_str()),
                none_sentinel,
            ),
            allergies: count_tokens(records.iter().map(|r| r.allergies.as_str()), none_sentinel),
        },
    }
}
