use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{DEFAULT_PROVIDER_TIMEOUT, ProviderError, get_json};
use crate::domain::covers::{Provider, ProviderMatch, TitleSearch};

pub const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Title search against the Google Books volumes API.
///
/// Works without an API key, at the cost of the provider's anonymous rate limits.
#[derive(Clone)]
pub struct GoogleBooksClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    timeout: Duration,
}

impl GoogleBooksClient {
    pub fn new(http: reqwest::Client, endpoint: Url, api_key: Option<String>) -> Self {
        Self {
            http,
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn search_url(&self, title: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", &format!("intitle:{title}"))
                .append_pair("maxResults", "1");
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        url
    }

    async fn try_search(&self, title: &str) -> Result<Option<ProviderMatch>, ProviderError> {
        let response: VolumesResponse =
            get_json(&self.http, self.search_url(title), self.timeout).await?;
        Ok(response.into_match())
    }
}

#[async_trait]
impl TitleSearch for GoogleBooksClient {
    fn provider(&self) -> Provider {
        Provider::GoogleBooks
    }

    async fn search(&self, title: &str) -> Option<ProviderMatch> {
        match self.try_search(title).await {
            Ok(found) => {
                debug!(title, found = found.is_some(), "google books search finished");
                found
            }
            Err(err) => {
                warn!(title, error = %err, "google books search failed");
                None
            }
        }
    }
}

/// Google sometimes hands out `http:` thumbnail links; serve them over https.
fn secure_thumbnail(url: String) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url,
    }
}

// --- Google Books API types ---

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

impl VolumesResponse {
    fn into_match(self) -> Option<ProviderMatch> {
        let info = self.items.into_iter().next()?.volume_info?;

        let isbn = info
            .identifier("ISBN_13")
            .or_else(|| info.identifier("ISBN_10"));

        let thumbnail_url = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .filter(|url| !url.trim().is_empty())
            .map(secure_thumbnail);

        Some(ProviderMatch {
            isbn,
            thumbnail_url,
            ..ProviderMatch::empty(Provider::GoogleBooks)
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    image_links: Option<ImageLinks>,
}

impl VolumeInfo {
    fn identifier(&self, kind: &str) -> Option<String> {
        self.industry_identifiers
            .iter()
            .find(|id| id.kind == kind)
            .map(|id| id.identifier.clone())
    }
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}
