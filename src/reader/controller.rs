use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::{ChapterSummary, PositionWrite};

use super::debounce::Debouncer;
use super::navigation::{self, ChapterNeighbors};
use super::share_link;

/// Quiet period between the last position change and the durable write.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Receiver of the reader's progress writes. Saves are best-effort: the
/// session logs and swallows failures, reading is never interrupted by a
/// broken write path.
#[async_trait::async_trait]
pub trait ProgressSink: Send + Sync + 'static {
    async fn save(&self, write: PositionWrite) -> anyhow::Result<()>;
}

/// Receiver of the reader's replace-style URL pushes. Externally observed
/// URL changes flow back in through [`ReaderSession::sync_from_url`], not
/// through this trait.
pub trait UrlBar: Send + Sync + 'static {
    fn replace(&self, query: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
}

/// Signal that this session is over; the caller loads the target chapter
/// and opens a fresh session for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterTransition {
    pub chapter_id: i32,
}

/// State machine for one open chapter. Owns the single source of truth
/// for the displayed page and keeps the shareable URL and the durable
/// position in step with it.
///
/// `total_pages == 0` is the terminal empty-chapter state: every
/// navigation operation is a no-op and no write is ever issued.
pub struct ReaderSession {
    comic_id: i32,
    chapter_id: i32,
    total_pages: u32,
    current_page: u32,
    chapters: Vec<ChapterSummary>,
    neighbors: ChapterNeighbors,
    sink: Arc<dyn ProgressSink>,
    url: Arc<dyn UrlBar>,
    save_timer: Debouncer,
}

impl ReaderSession {
    /// Open a session on a chapter, clamping the requested page into
    /// `[1, total_pages]`. Landing on a page already counts as a settle,
    /// so a non-empty open schedules the first debounced write.
    pub fn open(
        comic_id: i32,
        chapter_id: i32,
        total_pages: u32,
        requested_page: u32,
        chapters: Vec<ChapterSummary>,
        sink: Arc<dyn ProgressSink>,
        url: Arc<dyn UrlBar>,
    ) -> Self {
        let neighbors = navigation::resolve_neighbors(&chapters, chapter_id);
        let mut session = Self {
            comic_id,
            chapter_id,
            total_pages,
            current_page: clamp(requested_page, total_pages),
            chapters,
            neighbors,
            sink,
            url,
            save_timer: Debouncer::new(SAVE_DEBOUNCE),
        };
        if !session.is_empty() {
            session.schedule_save();
        }
        session
    }

    pub fn comic_id(&self) -> i32 {
        self.comic_id
    }

    pub fn chapter_id(&self) -> i32 {
        self.chapter_id
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }

    pub fn neighbors(&self) -> ChapterNeighbors {
        self.neighbors
    }

    /// Jump to page `n`, clamped into the chapter. Pushes the new page to
    /// the URL (replace semantics) and, when the page actually changed,
    /// (re)schedules the debounced write.
    pub fn go_to_page(&mut self, n: u32) {
        if self.is_empty() {
            return;
        }
        let target = clamp(n, self.total_pages);
        self.url.replace(&share_link::page_query(target));
        if target != self.current_page {
            self.current_page = target;
            self.schedule_save();
        }
    }

    /// One page forward. At the last page with a known next chapter this
    /// flushes the current position and signals the transition; at the
    /// last page of the last chapter it is a no-op.
    pub async fn advance(&mut self) -> Option<ChapterTransition> {
        if self.is_empty() {
            return None;
        }
        if self.current_page < self.total_pages {
            self.go_to_page(self.current_page + 1);
            return None;
        }
        let next = self.neighbors.next?;
        self.flush_now().await;
        Some(ChapterTransition { chapter_id: next })
    }

    /// One page back. Page 1 is a hard stop, there is no implicit jump
    /// into the previous chapter.
    pub fn retreat(&mut self) {
        if self.is_empty() || self.current_page == 1 {
            return;
        }
        self.go_to_page(self.current_page - 1);
    }

    /// Leave for another chapter of the same comic, flushing the current
    /// position first. Ids not present in the trusted chapter index are
    /// ignored.
    pub async fn jump_to_chapter(&mut self, chapter_id: i32) -> Option<ChapterTransition> {
        if self.is_empty() {
            return None;
        }
        if !self.chapters.iter().any(|c| c.id == chapter_id) {
            return None;
        }
        self.flush_now().await;
        Some(ChapterTransition { chapter_id })
    }

    /// Pull path for an externally observed URL change (back/forward).
    /// Re-clamps into the chapter and schedules the debounced write, but
    /// never pushes back to the URL: pull must not echo into push.
    pub fn sync_from_url(&mut self, query: &str) {
        if self.is_empty() {
            return;
        }
        let target = clamp(share_link::page_from_query(query), self.total_pages);
        if target != self.current_page {
            self.current_page = target;
            self.schedule_save();
        }
    }

    pub async fn handle_key(&mut self, key: NavKey) -> Option<ChapterTransition> {
        match key {
            NavKey::Left => {
                self.retreat();
                None
            }
            NavKey::Right => self.advance().await,
        }
    }

    fn position(&self) -> PositionWrite {
        PositionWrite {
            comic_id: self.comic_id,
            chapter_id: self.chapter_id,
            page: self.current_page,
        }
    }

    fn schedule_save(&mut self) {
        let sink = Arc::clone(&self.sink);
        let write = self.position();
        self.save_timer.schedule(async move {
            if let Err(err) = sink.save(write).await {
                tracing::debug!(error = %err, "progress save failed");
            }
        });
    }

    /// Unconditional awaited write of the current position; the pending
    /// debounced write is superseded, never fired after the transition.
    async fn flush_now(&mut self) {
        self.save_timer.cancel();
        if let Err(err) = self.sink.save(self.position()).await {
            tracing::debug!(error = %err, "progress save failed");
        }
    }
}

fn clamp(n: u32, total: u32) -> u32 {
    if total == 0 {
        return 1;
    }
    n.clamp(1, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        saved: Mutex<Vec<PositionWrite>>,
        fail: bool,
    }

    impl RecordingSink {
        fn failing() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn writes(&self) -> Vec<PositionWrite> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ProgressSink for RecordingSink {
        async fn save(&self, write: PositionWrite) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("store unreachable");
            }
            self.saved.lock().unwrap().push(write);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingUrl {
        replaced: Mutex<Vec<String>>,
    }

    impl RecordingUrl {
        fn pushes(&self) -> Vec<String> {
            self.replaced.lock().unwrap().clone()
        }
    }

    impl UrlBar for RecordingUrl {
        fn replace(&self, query: &str) {
            self.replaced.lock().unwrap().push(query.to_string());
        }
    }

    const COMIC: i32 = 7;

    fn chapters() -> Vec<ChapterSummary> {
        vec![
            ChapterSummary {
                id: 1,
                chapter_number: 1,
                title: None,
            },
            ChapterSummary {
                id: 2,
                chapter_number: 2,
                title: Some("Interlude".into()),
            },
            ChapterSummary {
                id: 3,
                chapter_number: 3,
                title: None,
            },
        ]
    }

    fn session(
        chapter_id: i32,
        total_pages: u32,
        requested_page: u32,
        sink: &Arc<RecordingSink>,
        url: &Arc<RecordingUrl>,
    ) -> ReaderSession {
        ReaderSession::open(
            COMIC,
            chapter_id,
            total_pages,
            requested_page,
            chapters(),
            sink.clone(),
            url.clone(),
        )
    }

    async fn quiet_period() {
        tokio::time::sleep(SAVE_DEBOUNCE + Duration::from_millis(50)).await;
    }

    fn write(chapter_id: i32, page: u32) -> PositionWrite {
        PositionWrite {
            comic_id: COMIC,
            chapter_id,
            page,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn go_to_page_clamps_into_chapter_bounds() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 1, &sink, &url);
        for (requested, expected) in [(0, 1), (1, 1), (5, 5), (10, 10), (11, 10), (999, 10)] {
            s.go_to_page(requested);
            assert_eq!(s.current_page(), expected, "go_to_page({requested})");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn open_clamps_the_requested_page() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let s = session(2, 10, 25, &sink, &url);
        assert_eq!(s.current_page(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_chapter_is_terminal_and_never_writes() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 0, 5, &sink, &url);
        assert!(s.is_empty());
        assert_eq!(s.current_page(), 1);

        assert_eq!(s.advance().await, None);
        s.retreat();
        s.go_to_page(3);
        s.sync_from_url("?page=4");
        assert_eq!(s.jump_to_chapter(1).await, None);

        quiet_period().await;
        assert!(sink.writes().is_empty());
        assert!(url.pushes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_paging_coalesces_into_one_write_with_last_value() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 1, &sink, &url);
        for n in [2, 3, 4, 5, 6] {
            s.go_to_page(n);
        }
        quiet_period().await;
        assert_eq!(sink.writes(), vec![write(2, 6)]);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_page_is_written_after_the_quiet_period() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 1, &sink, &url);
        s.go_to_page(4);
        quiet_period().await;
        s.go_to_page(9);
        quiet_period().await;
        assert_eq!(sink.writes(), vec![write(2, 4), write(2, 9)]);
    }

    #[tokio::test(start_paused = true)]
    async fn advance_in_the_middle_of_a_chapter_turns_the_page() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 4, &sink, &url);
        assert_eq!(s.advance().await, None);
        assert_eq!(s.current_page(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn advance_at_last_page_flushes_before_the_transition() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(1, 10, 9, &sink, &url);
        // Pending debounce for page 10 when the transition happens.
        s.go_to_page(10);
        let transition = s.advance().await;
        assert_eq!(transition, Some(ChapterTransition { chapter_id: 2 }));
        // The flush is the only write; the superseded debounce never fires.
        assert_eq!(sink.writes(), vec![write(1, 10)]);
        quiet_period().await;
        assert_eq!(sink.writes(), vec![write(1, 10)]);
    }

    #[tokio::test(start_paused = true)]
    async fn advance_at_the_end_of_the_last_chapter_is_a_no_op() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(3, 5, 5, &sink, &url);
        quiet_period().await;
        let before = sink.writes();
        assert_eq!(s.advance().await, None);
        assert_eq!(s.current_page(), 5);
        quiet_period().await;
        assert_eq!(sink.writes(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn retreat_at_page_one_changes_nothing_and_writes_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 1, &sink, &url);
        quiet_period().await;
        let before = sink.writes();
        s.retreat();
        assert_eq!(s.current_page(), 1);
        quiet_period().await;
        assert_eq!(sink.writes(), before);
        assert!(url.pushes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn internal_change_pushes_replace_style_url() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 1, &sink, &url);
        s.go_to_page(3);
        assert_eq!(url.pushes(), vec!["?page=3".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn url_pull_updates_state_without_pushing_back() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 1, &sink, &url);
        s.sync_from_url("?page=8");
        assert_eq!(s.current_page(), 8);
        assert!(url.pushes().is_empty(), "pull must not echo into push");
        quiet_period().await;
        assert_eq!(sink.writes(), vec![write(2, 8)]);
    }

    #[tokio::test(start_paused = true)]
    async fn url_pull_clamps_and_defaults_garbage_to_page_one() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 5, &sink, &url);
        s.sync_from_url("?page=999");
        assert_eq!(s.current_page(), 10);
        s.sync_from_url("?page=garbage");
        assert_eq!(s.current_page(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn arrow_keys_map_to_retreat_and_advance() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 5, &sink, &url);
        assert_eq!(s.handle_key(NavKey::Right).await, None);
        assert_eq!(s.current_page(), 6);
        assert_eq!(s.handle_key(NavKey::Left).await, None);
        assert_eq!(s.current_page(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn jump_to_chapter_flushes_then_signals() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 6, &sink, &url);
        let transition = s.jump_to_chapter(3).await;
        assert_eq!(transition, Some(ChapterTransition { chapter_id: 3 }));
        assert_eq!(sink.writes(), vec![write(2, 6)]);
    }

    #[tokio::test(start_paused = true)]
    async fn jump_to_unknown_chapter_is_ignored() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(2, 10, 6, &sink, &url);
        assert_eq!(s.jump_to_chapter(99).await, None);
        assert!(sink.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_the_pending_write() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        {
            let mut s = session(2, 10, 1, &sink, &url);
            s.go_to_page(7);
        }
        quiet_period().await;
        assert!(
            sink.writes().is_empty(),
            "a stale write must not fire after the session ended"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_saves_are_swallowed_and_navigation_continues() {
        let sink = Arc::new(RecordingSink::failing());
        let url = Arc::new(RecordingUrl::default());
        let mut s = session(1, 10, 9, &sink, &url);
        s.go_to_page(10);
        quiet_period().await;
        let transition = s.advance().await;
        assert_eq!(transition, Some(ChapterTransition { chapter_id: 2 }));
    }

    #[tokio::test(start_paused = true)]
    async fn resume_round_trip_reopens_at_the_clamped_stored_page() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());
        // Store said page 25, the chapter has shrunk to 10 pages.
        let s = session(2, 10, 25, &sink, &url);
        assert_eq!((s.chapter_id(), s.current_page()), (2, 10));
    }

    // Comic with chapters of 10, 0 and 5 pages: finishing chapter 1 lands
    // in chapter 2's empty state without losing the last page of 1.
    #[tokio::test(start_paused = true)]
    async fn finishing_a_chapter_into_an_empty_one() {
        let sink = Arc::new(RecordingSink::default());
        let url = Arc::new(RecordingUrl::default());

        let mut first = session(1, 10, 10, &sink, &url);
        let transition = first.advance().await.expect("next chapter is known");
        assert_eq!(transition.chapter_id, 2);
        assert_eq!(sink.writes(), vec![write(1, 10)]);
        drop(first);

        let mut second = session(transition.chapter_id, 0, 1, &sink, &url);
        assert!(second.is_empty());
        assert_eq!(second.advance().await, None);
        quiet_period().await;
        // No further writes from the empty chapter.
        assert_eq!(sink.writes(), vec![write(1, 10)]);
    }
}
