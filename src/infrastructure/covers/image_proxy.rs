use std::time::Duration;

use axum::body::Bytes;
use thiserror::Error;
use tracing::warn;

/// Content type assumed when the image host does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
/// Largest cover body we are willing to buffer and re-serve.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct CoverImage {
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Debug, Error)]
pub enum ImageFetchError {
    /// The host answered, but not with an image we can serve.
    #[error("image host returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("image host returned an empty body")]
    Empty,
    #[error("image host returned {0} instead of an image")]
    NotAnImage(String),
    #[error("image body exceeds the size limit")]
    TooLarge,
    /// The request itself failed: DNS, connect, timeout or a broken body.
    #[error("image request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl ImageFetchError {
    /// Whether this is an expected miss rather than a failure of the request itself.
    pub fn is_planned_fallback(&self) -> bool {
        !matches!(self, Self::Transport(_))
    }
}

/// Download image bytes from `url` for re-serving under our own origin.
pub async fn fetch_image(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<CoverImage, ImageFetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|err| {
            warn!(url, error = %err, "failed to download cover image");
            ImageFetchError::Transport(err)
        })?;

    if !response.status().is_success() {
        warn!(url, status = %response.status(), "cover image download returned non-success");
        return Err(ImageFetchError::Status(response.status()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    if !content_type.starts_with("image/") {
        warn!(url, content_type = %content_type, "cover image URL did not return an image");
        return Err(ImageFetchError::NotAnImage(content_type));
    }

    let bytes = read_capped(url, response).await?;

    if bytes.is_empty() {
        warn!(url, "cover image download returned empty body");
        return Err(ImageFetchError::Empty);
    }

    Ok(CoverImage {
        bytes,
        content_type,
    })
}

/// Buffer the body, giving up as soon as it grows past `MAX_IMAGE_BYTES`.
async fn read_capped(url: &str, mut response: reqwest::Response) -> Result<Bytes, ImageFetchError> {
    if response
        .content_length()
        .is_some_and(|len| len > MAX_IMAGE_BYTES as u64)
    {
        warn!(url, length = ?response.content_length(), "cover image too large");
        return Err(ImageFetchError::TooLarge);
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|err| {
        warn!(url, error = %err, "failed to read cover image bytes");
        ImageFetchError::Transport(err)
    })? {
        if body.len() + chunk.len() > MAX_IMAGE_BYTES {
            warn!(url, "cover image body exceeded size limit");
            return Err(ImageFetchError::TooLarge);
        }
        body.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(body))
}
