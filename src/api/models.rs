use chrono::{DateTime, Utc};
use poem_openapi::{ApiResponse, Object, payload::Json};

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

impl From<String> for ErrorDto {
    fn from(message: String) -> Self {
        ErrorDto { message }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct HealthDto {
    pub service: String,
    pub version: String,
    pub database: String,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ComicSummaryDto {
    pub id: i32,
    pub title: String,
    pub author_name: String,
    pub rating: f32,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ChapterSummaryDto {
    pub id: i32,
    pub chapter_number: i32,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ComicDetailDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub author_name: String,
    pub release_year: Option<i32>,
    pub status: String,
    pub rating: f32,
    pub cover_url: Option<String>,
    pub chapters: Vec<ChapterSummaryDto>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ChapterPageDto {
    pub page_number: u32,
    pub image_url: String,
}

/// Everything the reader needs to open a session on a chapter: the
/// ordered pages, the comic's ordered chapter index and the neighbor ids.
#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ChapterViewDto {
    pub comic_id: i32,
    pub comic_title: String,
    pub chapter: ChapterSummaryDto,
    pub pages: Vec<ChapterPageDto>,
    pub chapters: Vec<ChapterSummaryDto>,
    pub prev_chapter_id: Option<i32>,
    pub next_chapter_id: Option<i32>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct SaveProgressRequestDto {
    pub comic_id: i32,
    pub chapter_id: i32,
    /// 1-based page; omitted or zero is floored to 1.
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct SaveProgressResultDto {
    pub ok: bool,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ReadingPositionDto {
    pub comic_id: i32,
    pub chapter_id: i32,
    pub page: u32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ContinueReadingItemDto {
    pub comic_id: i32,
    pub comic_title: String,
    pub cover_url: Option<String>,
    pub chapter_id: i32,
    pub chapter_number: i32,
    pub page: u32,
    pub total_pages: u32,
    pub updated_at: DateTime<Utc>,
}

#[derive(ApiResponse)]
pub enum HealthResponseDto {
    /// Service is up and the database answers
    #[oai(status = 200)]
    Ok(Json<HealthDto>),

    /// Database unreachable
    #[oai(status = 500)]
    Internal(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum CatalogResponseDto {
    /// Comics successfully retrieved
    #[oai(status = 200)]
    Ok(Json<Vec<ComicSummaryDto>>),

    /// Store error
    #[oai(status = 500)]
    Internal(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ComicDetailResponseDto {
    /// Comic with its chapter index
    #[oai(status = 200)]
    Ok(Json<ComicDetailDto>),

    /// Unknown comic
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    /// Store error
    #[oai(status = 500)]
    Internal(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ChapterViewResponseDto {
    /// Chapter view for the reader
    #[oai(status = 200)]
    Ok(Json<ChapterViewDto>),

    /// Unknown comic or chapter, or a chapter of another comic
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    /// Store error
    #[oai(status = 500)]
    Internal(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum SaveProgressResponseDto {
    /// Position upserted
    #[oai(status = 200)]
    Ok(Json<SaveProgressResultDto>),

    /// Chapter does not belong to the posted comic
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Missing or unknown API token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    /// Store error
    #[oai(status = 500)]
    Internal(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ReadingPositionResponseDto {
    /// Stored position for the comic
    #[oai(status = 200)]
    Ok(Json<ReadingPositionDto>),

    /// No position stored yet
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    /// Missing or unknown API token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    /// Store error
    #[oai(status = 500)]
    Internal(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ContinueReadingResponseDto {
    /// Continue-reading feed, freshest first
    #[oai(status = 200)]
    Ok(Json<Vec<ContinueReadingItemDto>>),

    /// Missing or unknown API token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    /// Store error
    #[oai(status = 500)]
    Internal(Json<ErrorDto>),
}
