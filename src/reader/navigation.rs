use crate::domain::models::ChapterSummary;

/// Previous/next chapter ids around the open chapter, `None` at either
/// boundary of the comic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterNeighbors {
    pub prev: Option<i32>,
    pub next: Option<i32>,
}

/// Resolve neighbors of `current` within the comic's ordered chapter
/// index. Resolution is by position in the supplied sequence; chapter
/// numbers are expected to be unique per comic, duplicates are a data bug.
pub fn resolve_neighbors(chapters: &[ChapterSummary], current: i32) -> ChapterNeighbors {
    debug_assert!(
        unique_chapter_numbers(chapters),
        "duplicate chapter numbers in chapter index"
    );
    let Some(idx) = chapters.iter().position(|c| c.id == current) else {
        return ChapterNeighbors::default();
    };
    ChapterNeighbors {
        prev: (idx > 0).then(|| chapters[idx - 1].id),
        next: chapters.get(idx + 1).map(|c| c.id),
    }
}

fn unique_chapter_numbers(chapters: &[ChapterSummary]) -> bool {
    let mut seen = std::collections::HashSet::new();
    chapters.iter().all(|c| seen.insert(c.chapter_number))
}
