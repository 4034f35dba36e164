// Mapping from database entities to domain models

use super::models::{ChapterPage, ChapterSummary, ReadingPosition};

pub fn map_chapter_summary(m: &entities::chapter::Model) -> ChapterSummary {
    ChapterSummary {
        id: m.id,
        chapter_number: m.chapter_number,
        title: m.title.clone(),
    }
}

pub fn map_chapter_page(m: &entities::chapter_page::Model) -> ChapterPage {
    ChapterPage {
        page_number: m.page_number.max(1) as u32,
        image_url: m.image_url.clone(),
    }
}

/// The store accepts provisional pages; anything below 1 is floored here
/// so the domain invariant `page >= 1` holds everywhere downstream.
pub fn map_position(m: &entities::reading_position::Model) -> ReadingPosition {
    ReadingPosition {
        user_id: m.user_id,
        comic_id: m.comic_id,
        chapter_id: m.chapter_id,
        page: m.page.max(1) as u32,
        updated_at: m.updated_at,
    }
}
