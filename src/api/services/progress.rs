use poem_openapi::payload::Json;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::api::models::{
    ContinueReadingItemDto, ContinueReadingResponseDto, ErrorDto, ReadingPositionDto,
    ReadingPositionResponseDto, SaveProgressRequestDto, SaveProgressResponseDto,
    SaveProgressResultDto,
};
use crate::domain::models::PositionWrite;
use crate::storage::{PositionRepo, SeaOrmPositionRepo};

pub const DEFAULT_CONTINUE_LIMIT: u64 = 6;

pub struct ProgressService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> ProgressService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Upsert the acting user's position. The chapter must belong to the
    /// posted comic; everything else the store accepts as-is (pages past
    /// the current count stay provisional until the reader clamps them).
    #[tracing::instrument(level = "debug", skip(self, user, req))]
    pub async fn save(
        &self,
        user: &entities::user::Model,
        req: SaveProgressRequestDto,
    ) -> SaveProgressResponseDto {
        let chapter = match entities::chapter::Entity::find_by_id(req.chapter_id)
            .filter(entities::chapter::Column::ComicId.eq(req.comic_id))
            .one(self.db)
            .await
        {
            Ok(chapter) => chapter,
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to validate chapter");
                return SaveProgressResponseDto::Internal(Json(ErrorDto {
                    message: "Failed to save progress".to_string(),
                }));
            }
        };
        if chapter.is_none() {
            return SaveProgressResponseDto::BadRequest(Json(ErrorDto {
                message: "chapterId does not belong to comicId".to_string(),
            }));
        }

        let write = PositionWrite {
            comic_id: req.comic_id,
            chapter_id: req.chapter_id,
            page: req.page.unwrap_or(1).max(1),
        };
        match SeaOrmPositionRepo::new(self.db).upsert(user.id, write).await {
            Ok(()) => SaveProgressResponseDto::Ok(Json(SaveProgressResultDto { ok: true })),
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), user_id = user.id, "failed to upsert position");
                SaveProgressResponseDto::Internal(Json(ErrorDto {
                    message: "Failed to save progress".to_string(),
                }))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, user))]
    pub async fn position(
        &self,
        user: &entities::user::Model,
        comic_id: i32,
    ) -> ReadingPositionResponseDto {
        match SeaOrmPositionRepo::new(self.db).get(user.id, comic_id).await {
            Ok(Some(pos)) => ReadingPositionResponseDto::Ok(Json(ReadingPositionDto {
                comic_id: pos.comic_id,
                chapter_id: pos.chapter_id,
                page: pos.page,
                updated_at: pos.updated_at,
            })),
            Ok(None) => ReadingPositionResponseDto::NotFound(Json(ErrorDto {
                message: "No reading position for this comic".to_string(),
            })),
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), user_id = user.id, comic_id, "failed to load position");
                ReadingPositionResponseDto::Internal(Json(ErrorDto {
                    message: "Failed to load reading position".to_string(),
                }))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, user))]
    pub async fn continue_reading(
        &self,
        user: &entities::user::Model,
        limit: u64,
    ) -> ContinueReadingResponseDto {
        match SeaOrmPositionRepo::new(self.db).recent(user.id, limit).await {
            Ok(entries) => {
                let dtos = entries
                    .into_iter()
                    .map(|e| ContinueReadingItemDto {
                        comic_id: e.comic_id,
                        comic_title: e.comic_title,
                        cover_url: e.cover_url,
                        chapter_id: e.chapter_id,
                        chapter_number: e.chapter_number,
                        page: e.page,
                        total_pages: e.total_pages,
                        updated_at: e.updated_at,
                    })
                    .collect();
                ContinueReadingResponseDto::Ok(Json(dtos))
            }
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), user_id = user.id, "failed to load continue feed");
                ContinueReadingResponseDto::Internal(Json(ErrorDto {
                    message: "Failed to load continue-reading feed".to_string(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::{seed_chapter, seed_comic, seed_user, test_db};

    fn request(comic_id: i32, chapter_id: i32, page: Option<u32>) -> SaveProgressRequestDto {
        SaveProgressRequestDto {
            comic_id,
            chapter_id,
            page,
        }
    }

    #[tokio::test]
    async fn save_then_read_back_round_trips() {
        let db = test_db().await;
        let user = seed_user(&db, 1).await;
        seed_comic(&db, 1, "Tidebound").await;
        seed_chapter(&db, 10, 1, 1, 10).await;
        let service = ProgressService::new(&db);

        let saved = service.save(&user, request(1, 10, Some(4))).await;
        assert!(matches!(saved, SaveProgressResponseDto::Ok(_)));

        let ReadingPositionResponseDto::Ok(Json(pos)) = service.position(&user, 1).await else {
            panic!("expected Ok");
        };
        assert_eq!((pos.chapter_id, pos.page), (10, 4));
    }

    #[tokio::test]
    async fn missing_page_defaults_to_one() {
        let db = test_db().await;
        let user = seed_user(&db, 1).await;
        seed_comic(&db, 1, "Tidebound").await;
        seed_chapter(&db, 10, 1, 1, 10).await;
        let service = ProgressService::new(&db);

        service.save(&user, request(1, 10, None)).await;
        let ReadingPositionResponseDto::Ok(Json(pos)) = service.position(&user, 1).await else {
            panic!("expected Ok");
        };
        assert_eq!(pos.page, 1);
    }

    #[tokio::test]
    async fn chapter_of_another_comic_is_rejected() {
        let db = test_db().await;
        let user = seed_user(&db, 1).await;
        seed_comic(&db, 1, "Tidebound").await;
        seed_comic(&db, 2, "Hollow Crown").await;
        seed_chapter(&db, 20, 2, 1, 3).await;

        let saved = ProgressService::new(&db)
            .save(&user, request(1, 20, Some(2)))
            .await;
        assert!(matches!(saved, SaveProgressResponseDto::BadRequest(_)));
    }

    #[tokio::test]
    async fn unread_comic_has_no_position() {
        let db = test_db().await;
        let user = seed_user(&db, 1).await;
        seed_comic(&db, 1, "Tidebound").await;
        assert!(matches!(
            ProgressService::new(&db).position(&user, 1).await,
            ReadingPositionResponseDto::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn continue_feed_reports_totals_for_resume_bars() {
        let db = test_db().await;
        let user = seed_user(&db, 1).await;
        seed_comic(&db, 1, "Tidebound").await;
        seed_chapter(&db, 10, 1, 1, 10).await;
        let service = ProgressService::new(&db);
        service.save(&user, request(1, 10, Some(6))).await;

        let ContinueReadingResponseDto::Ok(Json(feed)) =
            service.continue_reading(&user, DEFAULT_CONTINUE_LIMIT).await
        else {
            panic!("expected Ok");
        };
        assert_eq!(feed.len(), 1);
        assert_eq!((feed[0].page, feed[0].total_pages), (6, 10));
        assert_eq!(feed[0].comic_title, "Tidebound");
    }
}
