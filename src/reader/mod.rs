// The chapter-reading session core: an explicit state machine for the
// current page, its debounced persistence and the shareable URL state.

pub mod controller;
pub mod debounce;
pub mod navigation;
pub mod share_link;

pub use controller::{ChapterTransition, NavKey, ProgressSink, ReaderSession, UrlBar};
