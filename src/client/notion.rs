// HTTP client for the Notion API surface this tool needs: find a book's
// page by title, create a page with properties and children, append more
// children. Authentication is a bearer token plus the pinned API version
// header.

use crate::client::blocks::Block;
use crate::model::GroupedBook;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

const NOTION_VERSION: &str = "2022-06-28";
const DEFAULT_BASE_URL: &str = "https://api.notion.com";

pub struct NotionClient {
    http: Client,
    base_url: String,
    token: String,
    database_id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<PageRef>,
}

#[derive(Debug, Deserialize)]
struct PageRef {
    id: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, token, database_id)
    }

    /// Same client against a different host; tests point this at a local
    /// mock server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
            database_id: database_id.into(),
        }
    }

    /// Id of the first page whose "Book Name" property contains the book
    /// name, or None when the database has no such page.
    pub async fn query_page_id(&self, book_name: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/v1/databases/{}/query",
            self.base_url, self.database_id
        );
        let body = json!({
            "filter": {
                "or": [
                    {
                        "property": "Book Name",
                        "rich_text": { "contains": book_name },
                    },
                ],
            },
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .context("Failed to reach Notion while querying the database")?;
        let response = Self::ensure_success(response, "database query").await?;

        let parsed: QueryResponse = response
            .json()
            .await
            .context("Unexpected database query response shape")?;
        Ok(parsed.results.into_iter().next().map(|page| page.id))
    }

    /// Create the book's page: title/author/book-name/highlight-count
    /// properties, the first batch of children blocks, and either an
    /// external cover (upgraded to https) or a fallback emoji icon.
    pub async fn create_page(
        &self,
        book: &GroupedBook,
        children: Vec<Block>,
        total_highlights: usize,
    ) -> Result<()> {
        let url = format!("{}/v1/pages", self.base_url);
        let mut body = json!({
            "parent": { "database_id": self.database_id },
            "properties": Self::page_properties(book, total_highlights),
            "children": children,
        });

        match book.cover_url.as_deref() {
            Some(cover) if !cover.is_empty() => {
                body["cover"] = json!({
                    "type": "external",
                    "external": { "url": cover.replace("http://", "https://") },
                });
            }
            _ => {
                body["icon"] = json!({ "type": "emoji", "emoji": "📘" });
            }
        }

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .context("Failed to reach Notion while creating a page")?;
        Self::ensure_success(response, "page creation").await?;
        Ok(())
    }

    /// Append children blocks to an existing page. Callers keep each call
    /// under the API's ~100 block cap.
    pub async fn append_blocks(&self, page_id: &str, children: Vec<Block>) -> Result<()> {
        let url = format!("{}/v1/blocks/{}/children", self.base_url, page_id);
        let body = json!({ "children": children });

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .context("Failed to reach Notion while appending blocks")?;
        Self::ensure_success(response, "block append").await?;
        Ok(())
    }

    fn page_properties(book: &GroupedBook, total_highlights: usize) -> Value {
        json!({
            "Title": {
                "title": [
                    { "text": { "content": book.title } },
                ],
            },
            "Author": {
                "type": "rich_text",
                "rich_text": [
                    { "type": "text", "text": { "content": book.author } },
                ],
            },
            "Book Name": {
                "type": "rich_text",
                "rich_text": [
                    { "type": "text", "text": { "content": book.title } },
                ],
            },
            "Highlights": {
                "type": "number",
                "number": total_highlights,
            },
        })
    }

    async fn ensure_success(
        response: reqwest::Response,
        action: &str,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Notion {} failed with {}: {}", action, status, body)
    }
}
