pub use sea_orm_migration::prelude::*;

mod m20260802_101010_create_users_table;
mod m20260802_101120_create_authors_table;
mod m20260802_101230_create_comics_table;
mod m20260802_101340_create_chapters_table;
mod m20260802_101450_create_chapter_pages_table;
mod m20260802_101600_create_reading_positions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260802_101010_create_users_table::Migration),
            Box::new(m20260802_101120_create_authors_table::Migration),
            Box::new(m20260802_101230_create_comics_table::Migration),
            Box::new(m20260802_101340_create_chapters_table::Migration),
            Box::new(m20260802_101450_create_chapter_pages_table::Migration),
            Box::new(m20260802_101600_create_reading_positions_table::Migration),
        ]
    }
}
