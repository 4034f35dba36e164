// Persistence for reading positions. One row per (user, comic), written
// through an on-conflict upsert: replaying a write is safe, and conflicting
// writers resolve last-by-arrival. There is deliberately no version or
// sequence guard, so a stale write from a second device can regress the
// stored position; the reader treats progress as best-effort (see the
// reader core) and the feed only loses freshness, never the session.

use anyhow::Context;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::domain::mapping::map_position;
use crate::domain::models::{ContinueEntry, PositionWrite, ReadingPosition};

#[async_trait::async_trait]
pub trait PositionRepo: Send + Sync {
    async fn get(&self, user_id: i32, comic_id: i32) -> anyhow::Result<Option<ReadingPosition>>;
    async fn upsert(&self, user_id: i32, write: PositionWrite) -> anyhow::Result<()>;
    async fn recent(&self, user_id: i32, limit: u64) -> anyhow::Result<Vec<ContinueEntry>>;
}

pub struct SeaOrmPositionRepo<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SeaOrmPositionRepo<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl PositionRepo for SeaOrmPositionRepo<'_> {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get(&self, user_id: i32, comic_id: i32) -> anyhow::Result<Option<ReadingPosition>> {
        let row = entities::reading_position::Entity::find()
            .filter(entities::reading_position::Column::UserId.eq(user_id))
            .filter(entities::reading_position::Column::ComicId.eq(comic_id))
            .one(self.db)
            .await
            .with_context(|| "Failed to load reading position")?;
        Ok(row.map(|m| map_position(&m)))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn upsert(&self, user_id: i32, write: PositionWrite) -> anyhow::Result<()> {
        let model = entities::reading_position::ActiveModel {
            user_id: Set(user_id),
            comic_id: Set(write.comic_id),
            chapter_id: Set(write.chapter_id),
            page: Set(write.page.max(1) as i32),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        entities::reading_position::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    entities::reading_position::Column::UserId,
                    entities::reading_position::Column::ComicId,
                ])
                .update_columns([
                    entities::reading_position::Column::ChapterId,
                    entities::reading_position::Column::Page,
                    entities::reading_position::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(self.db)
            .await
            .with_context(|| "Failed to upsert reading position")?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn recent(&self, user_id: i32, limit: u64) -> anyhow::Result<Vec<ContinueEntry>> {
        let positions = entities::reading_position::Entity::find()
            .filter(entities::reading_position::Column::UserId.eq(user_id))
            .order_by_desc(entities::reading_position::Column::UpdatedAt)
            .limit(limit)
            .all(self.db)
            .await
            .with_context(|| "Failed to load recent reading positions")?;

        let mut feed = Vec::with_capacity(positions.len());
        for pos in positions {
            let Some(comic) = entities::comic::Entity::find_by_id(pos.comic_id)
                .one(self.db)
                .await
                .with_context(|| "Failed to load comic for continue feed")?
            else {
                continue;
            };
            let Some(chapter) = entities::chapter::Entity::find_by_id(pos.chapter_id)
                .one(self.db)
                .await
                .with_context(|| "Failed to load chapter for continue feed")?
            else {
                continue;
            };
            let total_pages = entities::chapter_page::Entity::find()
                .filter(entities::chapter_page::Column::ChapterId.eq(chapter.id))
                .count(self.db)
                .await
                .with_context(|| "Failed to count chapter pages")?;

            feed.push(ContinueEntry {
                comic_id: comic.id,
                comic_title: comic.title,
                cover_url: comic.cover_url,
                chapter_id: chapter.id,
                chapter_number: chapter.chapter_number,
                page: pos.page.max(1) as u32,
                total_pages: total_pages as u32,
                updated_at: pos.updated_at,
            });
        }
        Ok(feed)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use sea_orm::ActiveValue::Set;
    use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection};
    use migration::MigratorTrait;

    /// In-memory sqlite with migrations applied. Capped to a single
    /// connection so every query sees the same memory database.
    pub async fn test_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.expect("connect sqlite");
        migration::Migrator::up(&db, None).await.expect("migrate");
        db
    }

    pub async fn seed_user(db: &DatabaseConnection, id: i32) -> entities::user::Model {
        entities::user::ActiveModel {
            id: Set(id),
            username: Set(format!("reader{id}")),
            email: Set(format!("reader{id}@example.com")),
            api_token: Set(uuid::Uuid::new_v4()),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .expect("seed user")
    }

    pub async fn seed_comic(db: &DatabaseConnection, id: i32, title: &str) -> entities::comic::Model {
        entities::author::ActiveModel {
            id: Set(id),
            name: Set(format!("Author {id}")),
            country: Set(None),
        }
        .insert(db)
        .await
        .expect("seed author");
        entities::comic::ActiveModel {
            id: Set(id),
            title: Set(title.to_string()),
            description: Set(None),
            author_id: Set(id),
            release_year: Set(Some(2019)),
            status: Set("ongoing".to_string()),
            rating: Set(0.0),
            cover_url: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .expect("seed comic")
    }

    pub async fn seed_chapter(
        db: &DatabaseConnection,
        id: i32,
        comic_id: i32,
        chapter_number: i32,
        pages: u32,
    ) -> entities::chapter::Model {
        let chapter = entities::chapter::ActiveModel {
            id: Set(id),
            comic_id: Set(comic_id),
            chapter_number: Set(chapter_number),
            title: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .expect("seed chapter");
        for page_number in 1..=pages {
            entities::chapter_page::ActiveModel {
                chapter_id: Set(id),
                page_number: Set(page_number as i32),
                image_url: Set(format!("https://img.example.com/{id}/{page_number}.jpg")),
                ..Default::default()
            }
            .insert(db)
            .await
            .expect("seed page");
        }
        chapter
    }
}
