//! SeaORM-backed implementation of the responses port.
//!
//! Generic over `C: ConnectionTrait`, so it accepts a `DatabaseConnection`
//! or a transaction.

use anyhow::Context;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::contract::model::GuestResponse;
use crate::domain::repo::ResponsesRepository;
use crate::infra::storage::entity::{ActiveModel as ResponseAM, Column, Entity as ResponseEntity};

pub struct SeaOrmResponsesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmResponsesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> ResponsesRepository for SeaOrmResponsesRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, r: GuestResponse) -> anyhow::Result<()> {
        let m = ResponseAM {
            id: Set(r.id),
            first_name: Set(r.first_name),
            last_name: Set(r.last_name),
            intolerances: Set(r.intolerances),
            allergies: Set(r.allergies),
            notes: Set(r.notes),
            language: Set(r.language.code().to_string()),
            submitted_at: Set(r.submitted_at),
        };
        let _ = m.insert(&self.conn).await.context("insert failed")?;
        Ok(())
    }

    async fn list_newest_first(&self) -> anyhow::Result<Vec<GuestResponse>> {
        let rows = ResponseEntity::find()
            .order_by_desc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("list_newest_first failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<GuestResponse>> {
        let found = ResponseEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = ResponseEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
