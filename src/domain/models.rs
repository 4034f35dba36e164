// Domain models shared by the reader core, the storage layer and the API
// mappers; store- and transport-agnostic.

use chrono::{DateTime, Utc};

/// One image page of a chapter. `page_number` is 1-based and dense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterPage {
    pub page_number: u32,
    pub image_url: String,
}

/// Entry of a comic's ordered chapter index, ascending by `chapter_number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSummary {
    pub id: i32,
    pub chapter_number: i32,
    pub title: Option<String>,
}

/// Durable "where the user left off" record, unique per (user, comic).
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingPosition {
    pub user_id: i32,
    pub comic_id: i32,
    pub chapter_id: i32,
    /// 1-based page within the chapter. May exceed the chapter's current
    /// page count; the reader clamps before display.
    pub page: u32,
    pub updated_at: DateTime<Utc>,
}

/// One progress write emitted by the reader. The acting user is resolved
/// by the transport, not carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionWrite {
    pub comic_id: i32,
    pub chapter_id: i32,
    pub page: u32,
}

/// Row of the continue-reading feed, freshest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinueEntry {
    pub comic_id: i32,
    pub comic_title: String,
    pub cover_url: Option<String>,
    pub chapter_id: i32,
    pub chapter_number: i32,
    pub page: u32,
    pub total_pages: u32,
    pub updated_at: DateTime<Utc>,
}
