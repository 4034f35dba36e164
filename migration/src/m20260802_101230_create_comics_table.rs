use crate::m20260802_101120_create_authors_table::Authors;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comics::Table)
                    .if_not_exists()
                    .col(pk_auto(Comics::Id))
                    .col(string(Comics::Title))
                    .col(text_null(Comics::Description))
                    .col(integer(Comics::AuthorId))
                    .col(integer_null(Comics::ReleaseYear))
                    .col(string(Comics::Status).default("ongoing"))
                    .col(float(Comics::Rating).default(0.0))
                    .col(text_null(Comics::CoverUrl))
                    .col(timestamp_with_time_zone(Comics::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comics_author_id")
                            .from(Comics::Table, Comics::AuthorId)
                            .to(Authors::Table, Authors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comics::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Comics {
    Table,
    Id,
    Title,
    Description,
    AuthorId,
    ReleaseYear,
    Status,
    Rating,
    CoverUrl,
    CreatedAt,
}
