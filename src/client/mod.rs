// HTTP client for the mangashelf API. This is the reader side of the
// wire: it loads chapter views and is the production implementation of
// the reader core's ProgressSink.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::models::{ChapterSummary, PositionWrite};
use crate::reader::share_link;

#[derive(Clone, Debug)]
pub struct ShelfClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ShelfClient {
    /// Create a new client with the given base URL (e.g. "http://localhost:3000").
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating ShelfClient");
        Ok(ShelfClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    /// Return a client with the user's API token set (Bearer)
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn auth_header(&self) -> Option<(String, String)> {
        self.token
            .as_ref()
            .map(|t| ("Authorization".to_string(), format!("Bearer {}", t)))
    }

    /// Shareable deep link into a page of a chapter. Builds a public URL,
    /// performs no request.
    pub fn page_link(&self, comic_id: i32, chapter_id: i32, page: u32) -> String {
        format!(
            "{}{}",
            self.url(&format!("/comics/{}/chapters/{}", comic_id, chapter_id)),
            share_link::page_query(page)
        )
    }

    /// GET /v1/comics/:comic_id/chapters/:chapter_id
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_chapter_view(
        &self,
        comic_id: i32,
        chapter_id: i32,
    ) -> anyhow::Result<ChapterView> {
        let url = self.url(&format!("/v1/comics/{}/chapters/{}", comic_id, chapter_id));
        tracing::debug!(%url, "GET chapter view");
        let mut req = self.client.get(&url);
        if let Some((k, v)) = self.auth_header() {
            req = req.header(&k, &v);
        }
        let resp = req.send().await?;
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        match serde_json::from_str::<ChapterView>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let snippet_len = body.len().min(2000);
                let snippet = &body[..snippet_len];
                tracing::error!(error = %e, body_snippet = %snippet, "failed to parse ChapterView");
                Err(e.into())
            }
        }
    }

    /// POST /v1/reading/progress
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn save_progress(
        &self,
        comic_id: i32,
        chapter_id: i32,
        page: u32,
    ) -> anyhow::Result<()> {
        let url = self.url("/v1/reading/progress");
        tracing::debug!(%url, comic_id, chapter_id, page, "POST reading progress");
        let mut req = self.client.post(&url).json(&serde_json::json!({
            "comicId": comic_id,
            "chapterId": chapter_id,
            "page": page,
        }));
        if let Some((k, v)) = self.auth_header() {
            req = req.header(&k, &v);
        }
        let resp = req.send().await?;
        resp.error_for_status()?;
        Ok(())
    }

    /// GET /v1/reading/progress/:comic_id; None when nothing is stored yet
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_progress(&self, comic_id: i32) -> anyhow::Result<Option<StoredPosition>> {
        let url = self.url(&format!("/v1/reading/progress/{}", comic_id));
        tracing::debug!(%url, "GET reading progress");
        let mut req = self.client.get(&url);
        if let Some((k, v)) = self.auth_header() {
            req = req.header(&k, &v);
        }
        let resp = req.send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        let parsed: StoredPosition = serde_json::from_str(&body)?;
        Ok(Some(parsed))
    }

    /// GET /v1/reading/continue
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn continue_reading(&self, limit: Option<u64>) -> anyhow::Result<Vec<ContinueItem>> {
        let mut url = self.url("/v1/reading/continue");
        if let Some(limit) = limit {
            url = format!("{}?limit={}", url, limit);
        }
        tracing::debug!(%url, "GET continue reading");
        let mut req = self.client.get(&url);
        if let Some((k, v)) = self.auth_header() {
            req = req.header(&k, &v);
        }
        let resp = req.send().await?;
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        let parsed: Vec<ContinueItem> = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl crate::reader::ProgressSink for ShelfClient {
    async fn save(&self, write: PositionWrite) -> anyhow::Result<()> {
        self.save_progress(write.comic_id, write.chapter_id, write.page)
            .await
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterView {
    pub comic_id: i32,
    pub comic_title: String,
    pub chapter: ChapterItem,
    pub pages: Vec<PageItem>,
    pub chapters: Vec<ChapterItem>,
    pub prev_chapter_id: Option<i32>,
    pub next_chapter_id: Option<i32>,
}

impl ChapterView {
    /// The chapter index as the reader core consumes it.
    pub fn chapter_index(&self) -> Vec<ChapterSummary> {
        self.chapters
            .iter()
            .map(|c| ChapterSummary {
                id: c.id,
                chapter_number: c.chapter_number,
                title: c.title.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterItem {
    pub id: i32,
    pub chapter_number: i32,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageItem {
    pub page_number: u32,
    pub image_url: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredPosition {
    pub comic_id: i32,
    pub chapter_id: i32,
    pub page: u32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContinueItem {
    pub comic_id: i32,
    pub comic_title: String,
    pub cover_url: Option<String>,
    pub chapter_id: i32,
    pub chapter_number: i32,
    pub page: u32,
    pub total_pages: u32,
    pub updated_at: DateTime<Utc>,
}
