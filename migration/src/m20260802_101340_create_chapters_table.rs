use crate::m20260802_101230_create_comics_table::Comics;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Chapters::Table)
                    .if_not_exists()
                    .col(pk_auto(Chapters::Id))
                    .col(integer(Chapters::ComicId))
                    .col(integer(Chapters::ChapterNumber))
                    .col(string_null(Chapters::Title))
                    .col(timestamp_with_time_zone(Chapters::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chapters_comic_id")
                            .from(Chapters::Table, Chapters::ComicId)
                            .to(Comics::Table, Comics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Chapters::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Chapters {
    Table,
    Id,
    ComicId,
    ChapterNumber,
    Title,
    CreatedAt,
}
