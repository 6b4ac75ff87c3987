use serde::{Deserialize, Serialize};

use crate::contract::model::Language;
use crate::domain::service::ServiceConfig;
use crate::domain::venue::{Venue, VenueKind};

/// Configuration of the rsvp module (`modules.rsvp`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsvpConfig {
    pub admin: AdminConfig,
    /// Token meaning "none" that guests sometimes type; never counted.
    pub none_sentinel: String,
    /// `it` or `sq`; used when a request names no language.
    pub default_language: String,
    pub report: ReportConfig,
    pub venues: Vec<VenueConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VenueKindConfig {
    Ceremony,
    Reception,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VenueConfig {
    pub kind: VenueKindConfig,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub time: Option<String>,
    /// Defaults to the venue name.
    #[serde(default)]
    pub map_query: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "cla&ago".to_string(),
            password: "29082026".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Report Partecipanti Matrimonio".to_string(),
            filename: "report_matrimonio.pdf".to_string(),
        }
    }
}

impl Default for RsvpConfig {
    fn default() -> Self {
        Self {
            admin: AdminConfig::default(),
            none_sentinel: "Nessuna".to_string(),
            default_language: "it".to_string(),
            report: ReportConfig::default(),
            venues: vec![
                VenueConfig {
                    kind: VenueKindConfig::Ceremony,
                    name: "Chiesa Parrocchiale di San Biagio".to_string(),
                    address: "Piazza Santo Amato Ronconi, 47835 Saludecio (RN)".to_string(),
                    time: Some("16:00".to_string()),
                    map_query: Some("Chiesa Parrocchiale di San Biagio Saludecio".to_string()),
                },
                VenueConfig {
                    kind: VenueKindConfig::Reception,
                    name: "Villa i Tramonti".to_string(),
                    address: "Saludecio (RN)".to_string(),
                    time: None,
                    map_query: Some("Villa i Tramonti Saludecio".to_string()),
                },
            ],
        }
    }
}

impl From<&VenueConfig> for Venue {
    fn from(v: &VenueConfig) -> Self {
        Self {
            kind: match v.kind {
                VenueKindConfig::Ceremony => VenueKind::Ceremony,
                VenueKindConfig::Reception => VenueKind::Reception,
            },
            name: v.name.clone(),
            address: v.address.clone(),
            time: v.time.clone(),
            map_query: v.map_query.clone().unwrap_or_else(|| v.name.clone()),
        }
    }
}

impl RsvpConfig {
    pub fn service_config(&self) -> anyhow::Result<ServiceConfig> {
        if self.admin.username.is_empty() || self.admin.password.is_empty() {
            anyhow::bail!("modules.rsvp.admin requires both username and password");
        }
        let default_language: Language = self
            .default_language
            .parse()
            .map_err(|e| anyhow::anyhow!("modules.rsvp.default_language: {e}"))?;

        Ok(ServiceConfig {
            none_sentinel: self.none_sentinel.clone(),
            default_language,
            admin_username: self.admin.username.clone(),
            admin_password: self.admin.password.clone(),
            report_filename: self.report.filename.clone(),
            venues: self.venues.iter().map(Venue::from).collect(),
        })
    }
}
