pub use super::author::Entity as Author;
pub use super::chapter::Entity as Chapter;
pub use super::chapter_page::Entity as ChapterPage;
pub use super::comic::Entity as Comic;
pub use super::reading_position::Entity as ReadingPosition;
pub use super::user::Entity as User;
