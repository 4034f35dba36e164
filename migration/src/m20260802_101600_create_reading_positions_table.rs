use crate::m20260802_101010_create_users_table::Users;
use crate::m20260802_101230_create_comics_table::Comics;
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
                    .table(ReadingPositions::Table)
                    .if_not_exists()
                    .col(pk_auto(ReadingPositions::Id))
                    .col(integer(ReadingPositions::UserId))
                    .col(integer(ReadingPositions::ComicId))
                    .col(integer(ReadingPositions::ChapterId))
                    .col(integer(ReadingPositions::Page).default(1))
                    .col(
                        timestamp_with_time_zone(ReadingPositions::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reading_positions_user_id")
                            .from(ReadingPositions::Table, ReadingPositions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reading_positions_comic_id")
                            .from(ReadingPositions::Table, ReadingPositions::ComicId)
                            .to(Comics::Table, Comics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reading_positions_chapter_id")
                            .from(ReadingPositions::Table, ReadingPositions::ChapterId)
                            .to(Chapters::Table, Chapters::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Upsert target: at most one position per (user, comic).
        manager
            .create_index(
                Index::create()
                    .name("idx_reading_positions_user_comic")
                    .table(ReadingPositions::Table)
                    .col(ReadingPositions::UserId)
                    .col(ReadingPositions::ComicId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReadingPositions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ReadingPositions {
    Table,
    Id,
    UserId,
    ComicId,
    ChapterId,
    Page,
    UpdatedAt,
}
