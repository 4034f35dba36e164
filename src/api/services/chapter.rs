use anyhow::Context;
use poem_openapi::payload::Json;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::api::models::{
    ChapterPageDto, ChapterSummaryDto, ChapterViewDto, ChapterViewResponseDto, ErrorDto,
};
use crate::domain::mapping::{map_chapter_page, map_chapter_summary};
use crate::reader::navigation;

pub struct ChapterService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> ChapterService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// The full view the reader opens a session on: ordered pages, the
    /// comic's ordered chapter index and the neighbor chapter ids. A
    /// chapter id belonging to a different comic is not found, not a
    /// cross-comic view.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn view(&self, comic_id: i32, chapter_id: i32) -> ChapterViewResponseDto {
        match self.load_view(comic_id, chapter_id).await {
            Ok(Some(view)) => ChapterViewResponseDto::Ok(Json(view)),
            Ok(None) => ChapterViewResponseDto::NotFound(Json(ErrorDto {
                message: "Comic or chapter not found".to_string(),
            })),
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), comic_id, chapter_id, "failed to load chapter view");
                ChapterViewResponseDto::Internal(Json(ErrorDto {
                    message: "Failed to load chapter view".to_string(),
                }))
            }
        }
    }

    async fn load_view(
        &self,
        comic_id: i32,
        chapter_id: i32,
    ) -> anyhow::Result<Option<ChapterViewDto>> {
        let Some(comic) = entities::comic::Entity::find_by_id(comic_id)
            .one(self.db)
            .await
            .with_context(|| "Failed to load comic")?
        else {
            return Ok(None);
        };

        let Some(chapter) = entities::chapter::Entity::find_by_id(chapter_id)
            .filter(entities::chapter::Column::ComicId.eq(comic_id))
            .one(self.db)
            .await
            .with_context(|| "Failed to load chapter")?
        else {
            return Ok(None);
        };

        let pages = entities::chapter_page::Entity::find()
            .filter(entities::chapter_page::Column::ChapterId.eq(chapter_id))
            .order_by_asc(entities::chapter_page::Column::PageNumber)
            .all(self.db)
            .await
            .with_context(|| "Failed to load chapter pages")?;

        let chapters = entities::chapter::Entity::find()
            .filter(entities::chapter::Column::ComicId.eq(comic_id))
            .order_by_asc(entities::chapter::Column::ChapterNumber)
            .all(self.db)
            .await
            .with_context(|| "Failed to load chapter index")?;

        let index: Vec<_> = chapters.iter().map(map_chapter_summary).collect();
        let neighbors = navigation::resolve_neighbors(&index, chapter_id);

        Ok(Some(ChapterViewDto {
            comic_id: comic.id,
            comic_title: comic.title,
            chapter: ChapterSummaryDto {
                id: chapter.id,
                chapter_number: chapter.chapter_number,
                title: chapter.title,
            },
            pages: pages
                .iter()
                .map(map_chapter_page)
                .map(|p| ChapterPageDto {
                    page_number: p.page_number,
                    image_url: p.image_url,
                })
                .collect(),
            chapters: index
                .into_iter()
                .map(|c| ChapterSummaryDto {
                    id: c.id,
                    chapter_number: c.chapter_number,
                    title: c.title,
                })
                .collect(),
            prev_chapter_id: neighbors.prev,
            next_chapter_id: neighbors.next,
        }))
    }
}
