use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{
    Category, DietarySelection, GuestResponse, Group, Language, NewGuestResponse,
};
use crate::domain::catalog;
use crate::domain::error::DomainError;
use crate::domain::report::{Report, TokenCount};
use crate::domain::venue::Venue;

/// Guest submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "SubmitRsvpReq")]
pub struct SubmitRsvpReq {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// `it` or `sq`; the configured default when absent.
    #[serde(default)]
    pub language: Option<String>,
    /// Keys of ticked categories, e.g. `gluten`, `treeNuts`.
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub custom_intolerances: Vec<String>,
    #[serde(default)]
    pub custom_allergies: Vec<String>,
}

impl SubmitRsvpReq {
    pub fn into_new_response(self, default_language: Language) -> Result<NewGuestResponse, DomainError> {
        let language = parse_language(self.language.as_deref(), default_language)?;
        let selected: BTreeSet<Category> = self
            .selected
            .iter()
            .map(|k| k.parse::<Category>())
            .collect::<Result<_, String>>()
            .map_err(|e| DomainError::validation("selected", e))?;

        Ok(NewGuestResponse {
            first_name: self.first_name,
            last_name: self.last_name,
            notes: self.notes,
            language,
            selection: DietarySelection {
                selected,
                custom_intolerances: self.custom_intolerances,
                custom_allergies: self.custom_allergies,
            },
        })
    }
}

pub fn parse_language(code: Option<&str>, default: Language) -> Result<Language, DomainError> {
    match code {
        None => Ok(default),
        Some(c) if c.trim().is_empty() => Ok(default),
        Some(c) => c.parse().map_err(|e| DomainError::validation("language", e)),
    }
}

/// A stored response, text exactly as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(title = "GuestResponse")]
pub struct GuestResponseDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub intolerances: String,
    pub allergies: String,
    pub notes: String,
    pub submitted_at: DateTime<Utc>,
    pub language: String,
}

impl From<GuestResponse> for GuestResponseDto {
    fn from(r: GuestResponse) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            intolerances: r.intolerances,
            allergies: r.allergies,
            notes: r.notes,
            submitted_at: r.submitted_at,
            language: r.language.code().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "GuestResponseList")]
pub struct GuestResponseListDto {
    pub items: Vec<GuestResponseDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive match on first or last name.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LangQuery {
    /// `it` or `sq`.
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MapQuery {
    /// Place to look up.
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "LoginReq")]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "CategoryLabel")]
pub struct CategoryDto {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "CategoryGroup")]
pub struct CategoryGroupDto {
    pub group: String,
    pub title: String,
    pub categories: Vec<CategoryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "Catalog")]
pub struct CatalogDto {
    pub language: String,
    pub groups: Vec<CategoryGroupDto>,
    pub other_label: String,
    pub specify_placeholder: String,
}

impl CatalogDto {
    pub fn for_language(lang: Language) -> Self {
        Self {
            language: lang.code().to_string(),
            groups: Group::ALL
                .into_iter()
                .map(|g| CategoryGroupDto {
                    group: g.key().to_string(),
                    title: catalog::group_title(g, lang).to_string(),
                    categories: Category::in_group(g)
                        .map(|c| CategoryDto {
                            key: c.key().to_string(),
                            label: catalog::label(c, lang).to_string(),
                        })
                        .collect(),
                })
                .collect(),
            other_label: catalog::other_label(lang).to_string(),
            specify_placeholder: catalog::specify_placeholder(lang).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "TokenCount")]
pub struct TokenCountDto {
    pub token: String,
    pub count: usize,
}

impl From<TokenCount> for TokenCountDto {
    fn from(c: TokenCount) -> Self {
        Self {
            token: c.token,
            count: c.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "ReportRow")]
pub struct ReportRowDto {
    pub first_name: String,
    pub last_name: String,
    pub intolerances: String,
    pub allergies: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "Report")]
pub struct ReportDto {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub rows: Vec<ReportRowDto>,
    pub intolerances: Vec<TokenCountDto>,
    pub allergies: Vec<TokenCountDto>,
}

impl From<Report> for ReportDto {
    fn from(r: Report) -> Self {
        Self {
            generated_at: r.generated_at,
            total: r.stats.total,
            rows: r
                .rows
                .into_iter()
                .map(|row| ReportRowDto {
                    first_name: row.first_name,
                    last_name: row.last_name,
                    intolerances: row.intolerances,
                    allergies: row.allergies,
                    notes: row.notes,
                })
                .collect(),
            intolerances: r.stats.intolerances.into_iter().map(Into::into).collect(),
            allergies: r.stats.allergies.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "Venue")]
pub struct VenueDto {
    pub kind: String,
    pub name: String,
    pub address: String,
    pub time: Option<String>,
    pub map_url: String,
}

impl From<&Venue> for VenueDto {
    fn from(v: &Venue) -> Self {
        Self {
            kind: v.kind.key().to_string(),
            name: v.name.clone(),
            address: v.address.clone(),
            time: v.time.clone(),
            map_url: v.map_url(),
        }
    }
}
