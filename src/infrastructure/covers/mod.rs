pub mod google_books;
pub mod image_proxy;
pub mod open_library;
pub mod templates;

pub use google_books::GoogleBooksClient;
pub use image_proxy::{CoverImage, ImageFetchError};
pub use open_library::OpenLibraryClient;
pub use templates::OpenLibraryCovers;

use std::time::Duration;

use thiserror::Error;

pub const PLACEHOLDER_URL: &str = "https://placehold.co/300x450?text=No+Cover";
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = "Bookshelf/1.0";

/// Why a title search produced nothing. Logged, never surfaced to callers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed provider response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Send a GET and decode the JSON body, mapping each failure to a `ProviderError`.
async fn get_json<T>(
    client: &reqwest::Client,
    url: reqwest::Url,
    timeout: Duration,
) -> Result<T, ProviderError>
where
    T: serde::de::DeserializeOwned,
{
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(timeout)
        .send()
        .await
        .map_err(ProviderError::Transport)?;

    if !response.status().is_success() {
        return Err(ProviderError::Status(response.status()));
    }

    response.json::<T>().await.map_err(ProviderError::Decode)
}
