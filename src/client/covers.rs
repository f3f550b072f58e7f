// Book-cover lookup against the Google Books volume API.
//
// Strictly best-effort: the lookup walks a couple of volume candidates
// for a large or medium image, falls back to the first candidate's
// thumbnail, and degrades to None on any failure. A sync never aborts
// because a cover could not be found.
//
// The volume API rate-limits aggressively, so every outbound call is
// preceded by a fixed pause.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";
const CALL_PACING: Duration = Duration::from_secs(1);

pub struct CoverClient {
    http: Client,
    base_url: String,
    /// Volume candidates inspected before falling back to a thumbnail.
    candidates: usize,
    pacing: Duration,
}

#[derive(Debug, Deserialize)]
struct VolumeList {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(rename = "imageLinks", default)]
    image_links: ImageLinks,
}

#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    large: Option<String>,
    medium: Option<String>,
    thumbnail: Option<String>,
}

impl CoverClient {
    pub fn new(candidates: usize) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, candidates, CALL_PACING)
    }

    /// Same client against a different host and pacing; tests point this
    /// at a local mock server with the delay zeroed.
    pub fn with_base_url(base_url: impl Into<String>, candidates: usize, pacing: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            candidates,
            pacing,
        }
    }

    /// Cover image URL for a book, or None when no usable image turns up.
    /// Large and medium images win; after the candidate budget is spent,
    /// the first candidate's thumbnail is good enough.
    pub async fn find_cover(&self, title: &str, author: Option<&str>) -> Option<String> {
        let volumes = self.search_volumes(&sanitize_title(title), author).await?;

        for volume in volumes.iter().take(self.candidates) {
            if let Some(id) = volume.id.as_deref()
                && let Some(url) = self.quality_image(id).await
            {
                log::debug!("Found large/medium cover for '{}'", title);
                return Some(url);
            }
        }

        let thumbnail = volumes
            .first()
            .and_then(|v| v.volume_info.image_links.thumbnail.clone());
        if thumbnail.is_some() {
            log::debug!("Falling back to thumbnail cover for '{}'", title);
        } else {
            log::warn!("No cover found for '{}'", title);
        }
        thumbnail
    }

    async fn search_volumes(&self, title: &str, author: Option<&str>) -> Option<Vec<Volume>> {
        let query = match author {
            Some(author) => format!("{}+inauthor:{}", title, author),
            None => title.to_string(),
        };
        let url = format!("{}/books/v1/volumes?q={}", self.base_url, query);
        self.get_json::<VolumeList>(&url).await.map(|list| list.items)
    }

    /// Large or medium image of one volume, fetched from its detail
    /// endpoint (the search response does not carry the big sizes).
    async fn quality_image(&self, volume_id: &str) -> Option<String> {
        let url = format!(
            "{}/books/v1/volumes/{}?fields=id,volumeInfo(title,imageLinks)",
            self.base_url, volume_id
        );
        let volume = self.get_json::<Volume>(&url).await?;
        let links = volume.volume_info.image_links;
        links.large.or(links.medium)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Option<T> {
        sleep(self.pacing).await;
        let result = async {
            self.http
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json::<T>()
                .await
        }
        .await;

        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Cover lookup request failed ({}): {}", url, err);
                None
            }
        }
    }
}

/// The volume search chokes on `?` and `:` in titles; drop them.
fn sanitize_title(title: &str) -> String {
    title.replace(['?', ':'], "")
}
