use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::contract::model::{GuestResponse, Language};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rsvps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(column_type = "Text")]
    pub intolerances: String,
    #[sea_orm(column_type = "Text")]
    pub allergies: String,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub language: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for GuestResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            intolerances: m.intolerances,
            allergies: m.allergies,
            notes: m.notes,
            // Unknown codes only appear if the column was edited by hand.
            language: m.language.parse::<Language>().unwrap_or_default(),
            submitted_at: m.submitted_at,
        }
    }
}
