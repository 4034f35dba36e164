use std::sync::Arc;

use poem_openapi::{
    OpenApi, SecurityScheme,
    auth::Bearer,
    param::{Path, Query},
    payload::Json,
};
use sea_orm::DatabaseConnection;

use super::models::{
    CatalogResponseDto, ChapterViewResponseDto, ComicDetailResponseDto,
    ContinueReadingResponseDto, ErrorDto, HealthResponseDto, ReadingPositionResponseDto,
    SaveProgressRequestDto, SaveProgressResponseDto,
};
use super::services::{
    catalog::CatalogService, chapter::ChapterService, health::HealthService,
    progress::{DEFAULT_CONTINUE_LIMIT, ProgressService},
    user_for_token,
};

/// Static per-user API token; accounts are provisioned outside this
/// service, sessions and logins are not its concern.
#[derive(SecurityScheme)]
#[oai(ty = "bearer")]
pub struct UserToken(pub Bearer);

pub struct MangaShelfApi {
    pub db: Arc<DatabaseConnection>,
}

/// Shorthand for the match every authenticated route starts with.
macro_rules! require_user {
    ($self:ident, $auth:ident, $resp:ident) => {
        match user_for_token(&$self.db, &$auth.0.token).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return $resp::Unauthorized(Json(ErrorDto {
                    message: "Invalid API token".to_string(),
                }));
            }
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to resolve API token");
                return $resp::Internal(Json(ErrorDto {
                    message: "Failed to resolve API token".to_string(),
                }));
            }
        }
    };
}

#[OpenApi]
impl MangaShelfApi {
    /// Service liveness and database reachability
    #[oai(path = "/v1/health", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn health(&self) -> HealthResponseDto {
        HealthService::new(&self.db).check().await
    }

    /// Browse or search the comic catalog
    #[oai(path = "/v1/comics", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, q, limit, page))]
    async fn list_comics(
        &self,
        /// Title substring to search for
        Query(q): Query<Option<String>>,
        /// Max comics per page (default 50)
        Query(limit): Query<Option<u64>>,
        /// Result page starting at 0
        Query(page): Query<Option<u64>>,
    ) -> CatalogResponseDto {
        let limit = limit.unwrap_or(50);
        let page = page.unwrap_or(0);
        tracing::debug!(q = q.as_deref().unwrap_or(""), limit, page, "handling list_comics");
        CatalogService::new(&self.db)
            .list(q.as_deref(), limit, page)
            .await
    }

    /// Comic detail with its ordered chapter index
    #[oai(path = "/v1/comics/:comic_id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, comic_id))]
    async fn comic_detail(&self, comic_id: Path<i32>) -> ComicDetailResponseDto {
        CatalogService::new(&self.db).detail(comic_id.0).await
    }

    /// Chapter view for the reader: ordered pages, chapter index, neighbors
    #[oai(path = "/v1/comics/:comic_id/chapters/:chapter_id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, comic_id, chapter_id))]
    async fn chapter_view(
        &self,
        comic_id: Path<i32>,
        chapter_id: Path<i32>,
    ) -> ChapterViewResponseDto {
        ChapterService::new(&self.db)
            .view(comic_id.0, chapter_id.0)
            .await
    }

    /// Upsert the acting user's reading position for a comic
    #[oai(path = "/v1/reading/progress", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, auth, body))]
    async fn save_progress(
        &self,
        auth: UserToken,
        body: Json<SaveProgressRequestDto>,
    ) -> SaveProgressResponseDto {
        let user = require_user!(self, auth, SaveProgressResponseDto);
        ProgressService::new(&self.db).save(&user, body.0).await
    }

    /// Stored reading position for one comic
    #[oai(path = "/v1/reading/progress/:comic_id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, auth, comic_id))]
    async fn reading_position(
        &self,
        auth: UserToken,
        comic_id: Path<i32>,
    ) -> ReadingPositionResponseDto {
        let user = require_user!(self, auth, ReadingPositionResponseDto);
        ProgressService::new(&self.db)
            .position(&user, comic_id.0)
            .await
    }

    /// Continue-reading feed, freshest first
    #[oai(path = "/v1/reading/continue", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, auth, limit))]
    async fn continue_reading(
        &self,
        auth: UserToken,
        /// Max feed entries (default 6)
        Query(limit): Query<Option<u64>>,
    ) -> ContinueReadingResponseDto {
        let user = require_user!(self, auth, ContinueReadingResponseDto);
        ProgressService::new(&self.db)
            .continue_reading(&user, limit.unwrap_or(DEFAULT_CONTINUE_LIMIT))
            .await
    }
}
