use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Rsvps {
    Table,
    Id,
    FirstName,
    LastName,
    Intolerances,
    Allergies,
    Notes,
    Language,
    SubmittedAt,
}

const SUBMITTED_AT_INDEX: &str = "idx_rsvps_submitted_at";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rsvps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rsvps::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rsvps::FirstName).string().not_null())
                    .col(ColumnDef::new(Rsvps::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Rsvps::Intolerances)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Rsvps::Allergies).text().not_null().default(""))
                    .col(ColumnDef::new(Rsvps::Notes).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Rsvps::Language)
                            .string_len(8)
                            .not_null()
                            .default("it"),
                    )
                    .col(
                        ColumnDef::new(Rsvps::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(SUBMITTED_AT_INDEX)
                    .table(Rsvps::Table)
                    .col(Rsvps::SubmittedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rsvps::Table).if_exists().to_owned())
            .await
    }
}
