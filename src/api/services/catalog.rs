use poem_openapi::payload::Json;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::api::models::{
    CatalogResponseDto, ChapterSummaryDto, ComicDetailDto, ComicDetailResponseDto,
    ComicSummaryDto, ErrorDto,
};

pub struct CatalogService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> CatalogService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Browse or title-search the catalog. `q` matches as a substring,
    /// `page` is a 0-based result page of `limit` entries.
    #[tracing::instrument(level = "debug", skip(self, q))]
    pub async fn list(&self, q: Option<&str>, limit: u64, page: u64) -> CatalogResponseDto {
        let mut query = entities::comic::Entity::find()
            .find_also_related(entities::author::Entity)
            .order_by_asc(entities::comic::Column::Title);
        if let Some(needle) = q.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(entities::comic::Column::Title.contains(needle));
        }

        match query.limit(limit).offset(page * limit).all(self.db).await {
            Ok(rows) => {
                let dtos = rows
                    .into_iter()
                    .map(|(comic, author)| ComicSummaryDto {
                        id: comic.id,
                        title: comic.title,
                        author_name: author.map(|a| a.name).unwrap_or_default(),
                        rating: comic.rating,
                        cover_url: comic.cover_url,
                    })
                    .collect();
                CatalogResponseDto::Ok(Json(dtos))
            }
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to list comics");
                CatalogResponseDto::Internal(Json(ErrorDto {
                    message: "Failed to list comics".to_string(),
                }))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn detail(&self, comic_id: i32) -> ComicDetailResponseDto {
        let comic_with_author = match entities::comic::Entity::find_by_id(comic_id)
            .find_also_related(entities::author::Entity)
            .one(self.db)
            .await
        {
            Ok(row) => row,
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), comic_id, "failed to load comic");
                return ComicDetailResponseDto::Internal(Json(ErrorDto {
                    message: "Failed to load comic".to_string(),
                }));
            }
        };
        let Some((comic, author)) = comic_with_author else {
            return ComicDetailResponseDto::NotFound(Json(ErrorDto {
                message: "Comic not found".to_string(),
            }));
        };

        let chapters = match entities::chapter::Entity::find()
            .filter(entities::chapter::Column::ComicId.eq(comic_id))
            .order_by_asc(entities::chapter::Column::ChapterNumber)
            .all(self.db)
            .await
        {
            Ok(chapters) => chapters,
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), comic_id, "failed to load chapters");
                return ComicDetailResponseDto::Internal(Json(ErrorDto {
                    message: "Failed to load chapters".to_string(),
                }));
            }
        };

        ComicDetailResponseDto::Ok(Json(ComicDetailDto {
            id: comic.id,
            title: comic.title,
            description: comic.description,
            author_name: author.map(|a| a.name).unwrap_or_default(),
            release_year: comic.release_year,
            status: comic.status,
            rating: comic.rating,
            cover_url: comic.cover_url,
            chapters: chapters
                .iter()
                .map(|c| ChapterSummaryDto {
                    id: c.id,
                    chapter_number: c.chapter_number,
                    title: c.title.clone(),
                })
                .collect(),
        }))
    }
}
