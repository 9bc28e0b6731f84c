use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{DEFAULT_PROVIDER_TIMEOUT, ProviderError, get_json};
use crate::domain::covers::{Provider, ProviderMatch, TitleSearch};

pub const OPEN_LIBRARY_SEARCH_URL: &str = "https://openlibrary.org/search.json";

/// Title search against the Open Library search API. No key required.
#[derive(Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl OpenLibraryClient {
    pub fn new(http: reqwest::Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn search_url(&self, title: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("title", title)
            .append_pair("limit", "1");
        url
    }

    async fn try_search(&self, title: &str) -> Result<Option<ProviderMatch>, ProviderError> {
        let response: SearchResponse =
            get_json(&self.http, self.search_url(title), self.timeout).await?;
        Ok(response.into_match())
    }
}

#[async_trait]
impl TitleSearch for OpenLibraryClient {
    fn provider(&self) -> Provider {
        Provider::OpenLibrary
    }

    async fn search(&self, title: &str) -> Option<ProviderMatch> {
        match self.try_search(title).await {
            Ok(found) => {
                debug!(title, found = found.is_some(), "open library search finished");
                found
            }
            Err(err) => {
                warn!(title, error = %err, "open library search failed");
                None
            }
        }
    }
}

// --- Open Library API types ---

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

impl SearchResponse {
    fn into_match(self) -> Option<ProviderMatch> {
        let doc = self.docs.into_iter().next()?;

        Some(ProviderMatch {
            isbn: doc.isbn.into_iter().find(|isbn| !isbn.trim().is_empty()),
            cover_id: doc.cover_i.filter(|&id| id > 0),
            ..ProviderMatch::empty(Provider::OpenLibrary)
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    cover_i: Option<i64>,
    #[serde(default)]
    isbn: Vec<String>,
}
