use crate::m20260802_101340_create_chapters_table::Chapters;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChapterPages::Table)
                    .if_not_exists()
                    .col(pk_auto(ChapterPages::Id))
                    .col(integer(ChapterPages::ChapterId))
                    .col(integer(ChapterPages::PageNumber))
                    .col(text(ChapterPages::ImageUrl))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chapter_pages_chapter_id")
                            .from(ChapterPages::Table, ChapterPages::ChapterId)
                            .to(Chapters::Table, Chapters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chapter_pages_chapter_page")
                    .table(ChapterPages::Table)
                    .col(ChapterPages::ChapterId)
                    .col(ChapterPages::PageNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChapterPages::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ChapterPages {
    Table,
    Id,
    ChapterId,
    PageNumber,
    ImageUrl,
}
