use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use futures::FutureExt;
use tracing::{debug, error, info};

use crate::domain::covers::{
    CoverMetadata, CoverQuery, CoverSize, CoverSource, CoverStrategy, Provider, ProviderMatch,
    Resolution, ResponseFormat, TitleSearch,
};
use crate::infrastructure::covers::image_proxy::fetch_image;
use crate::infrastructure::covers::{CoverImage, OpenLibraryCovers};

/// `Cache-Control` max-age for a real cover.
pub const RESOLVED_MAX_AGE_SECS: u32 = 86_400;
/// `Cache-Control` max-age whenever the placeholder is served.
pub const FALLBACK_MAX_AGE_SECS: u32 = 3_600;

const EMBEDDED_PLACEHOLDER: &[u8] = include_bytes!("../../../assets/placeholder.svg");
const EMBEDDED_PLACEHOLDER_TYPE: &str = "image/svg+xml";

/// Resolution steps, tried in this order until one produces a cover URL.
#[derive(Debug, Clone, Copy)]
enum Step {
    Isbn,
    TitleViaGoogle,
    TitleViaOpenLibrary,
}

const STEPS: [Step; 3] = [Step::Isbn, Step::TitleViaGoogle, Step::TitleViaOpenLibrary];

/// Turns a `CoverQuery` into a cover URL, falling back to the placeholder.
///
/// Holds no mutable state: resolving the same query against the same provider
/// answers always yields the same `Resolution`.
#[derive(Clone)]
pub struct CoverResolver {
    google: Arc<dyn TitleSearch>,
    open_library: Arc<dyn TitleSearch>,
    covers: OpenLibraryCovers,
    placeholder_url: String,
}

impl CoverResolver {
    pub fn new(
        google: Arc<dyn TitleSearch>,
        open_library: Arc<dyn TitleSearch>,
        covers: OpenLibraryCovers,
        placeholder_url: impl Into<String>,
    ) -> Self {
        Self {
            google,
            open_library,
            covers,
            placeholder_url: placeholder_url.into(),
        }
    }

    pub fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }

    pub async fn resolve(&self, query: &CoverQuery) -> Resolution {
        for step in STEPS {
            if let Some(resolution) = self.try_step(step, query).await {
                debug!(
                    ?step,
                    strategy = %resolution.strategy,
                    url = %resolution.cover_url,
                    "cover resolved"
                );
                return resolution;
            }
        }

        debug!("no cover found, using placeholder");
        Resolution::placeholder(&self.placeholder_url)
    }

    async fn try_step(&self, step: Step, query: &CoverQuery) -> Option<Resolution> {
        match step {
            Step::Isbn => query
                .isbn
                .as_deref()
                .map(|isbn| self.isbn_cover(isbn, &query.size, CoverStrategy::DirectIsbn)),
            Step::TitleViaGoogle => self.title_search(self.google.as_ref(), query).await,
            Step::TitleViaOpenLibrary => self.title_search(self.open_library.as_ref(), query).await,
        }
    }

    async fn title_search(
        &self,
        provider: &dyn TitleSearch,
        query: &CoverQuery,
    ) -> Option<Resolution> {
        let title = query.title.as_deref()?;
        let Some(found) = provider.search(title).await else {
            debug!(provider = %provider.provider(), title, "no title match");
            return None;
        };
        self.from_match(found, &query.size)
    }

    /// Google Books: direct thumbnail, else its ISBN.
    /// Open Library: ISBN, else its numeric cover id.
    fn from_match(&self, found: ProviderMatch, size: &CoverSize) -> Option<Resolution> {
        match found.provider {
            Provider::GoogleBooks => found
                .thumbnail_url
                .map(|url| Resolution {
                    cover_url: url,
                    isbn: None,
                    strategy: CoverStrategy::GoogleThumbnail,
                })
                .or_else(|| {
                    found
                        .isbn
                        .map(|isbn| self.isbn_cover(&isbn, size, CoverStrategy::GoogleIsbn))
                }),
            Provider::OpenLibrary => found
                .isbn
                .map(|isbn| self.isbn_cover(&isbn, size, CoverStrategy::OpenLibraryIsbn))
                .or_else(|| {
                    found.cover_id.map(|id| Resolution {
                        cover_url: self.covers.by_id(id, size),
                        isbn: None,
                        strategy: CoverStrategy::OpenLibraryCoverId,
                    })
                }),
        }
    }

    fn isbn_cover(&self, isbn: &str, size: &CoverSize, strategy: CoverStrategy) -> Resolution {
        Resolution {
            cover_url: self.covers.by_isbn(isbn, size),
            isbn: Some(isbn.to_string()),
            strategy,
        }
    }
}

/// An image ready to be written to the response, with its caching metadata.
#[derive(Debug, Clone)]
pub struct ServedCover {
    pub bytes: Bytes,
    pub content_type: String,
    pub max_age_secs: u32,
    pub source: CoverSource,
    pub isbn: Option<String>,
}

impl ServedCover {
    fn fallback(image: CoverImage, source: CoverSource) -> Self {
        Self {
            bytes: image.bytes,
            content_type: image.content_type,
            max_age_secs: FALLBACK_MAX_AGE_SECS,
            source,
            isbn: None,
        }
    }

    fn embedded(source: CoverSource) -> Self {
        Self {
            bytes: Bytes::from_static(EMBEDDED_PLACEHOLDER),
            content_type: EMBEDDED_PLACEHOLDER_TYPE.to_string(),
            max_age_secs: FALLBACK_MAX_AGE_SECS,
            source,
            isbn: None,
        }
    }

    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.max_age_secs)
    }
}

/// Fetches resolved covers for re-serving and degrades to the placeholder on any failure.
#[derive(Clone)]
pub struct CoverResponder {
    http: reqwest::Client,
    placeholder_url: String,
    timeout: Duration,
}

impl CoverResponder {
    pub fn new(http: reqwest::Client, placeholder_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            placeholder_url: placeholder_url.into(),
            timeout,
        }
    }

    pub async fn serve(&self, resolution: &Resolution) -> ServedCover {
        match fetch_image(&self.http, &resolution.cover_url, self.timeout).await {
            Ok(image) if resolution.is_resolved() => ServedCover {
                bytes: image.bytes,
                content_type: image.content_type,
                max_age_secs: RESOLVED_MAX_AGE_SECS,
                source: resolution.source(),
                isbn: resolution.isbn.clone(),
            },
            Ok(image) => ServedCover::fallback(image, CoverSource::None),
            Err(err) => {
                let source = if err.is_planned_fallback() {
                    CoverSource::None
                } else {
                    CoverSource::Error
                };
                if resolution.is_resolved() {
                    info!(url = %resolution.cover_url, error = %err, "cover unavailable, serving placeholder");
                    self.placeholder(source).await
                } else {
                    ServedCover::embedded(source)
                }
            }
        }
    }

    /// Serve the placeholder image, or the built-in one if the placeholder host is down.
    pub async fn placeholder(&self, source: CoverSource) -> ServedCover {
        match fetch_image(&self.http, &self.placeholder_url, self.timeout).await {
            Ok(image) => ServedCover::fallback(image, source),
            Err(_) => ServedCover::embedded(source),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CoverResponse {
    Metadata(CoverMetadata),
    Image(ServedCover),
}

/// The cover endpoint: resolve, then describe or proxy the result.
#[derive(Clone)]
pub struct CoverService {
    resolver: CoverResolver,
    responder: CoverResponder,
}

impl CoverService {
    pub fn new(resolver: CoverResolver, responder: CoverResponder) -> Self {
        Self {
            resolver,
            responder,
        }
    }

    /// Never fails: a panic anywhere in the pipeline is answered with the
    /// placeholder tagged `error`.
    pub async fn respond(&self, query: &CoverQuery) -> CoverResponse {
        match AssertUnwindSafe(self.run(query)).catch_unwind().await {
            Ok(response) => response,
            Err(_) => {
                error!("cover pipeline panicked, serving placeholder");
                match query.format {
                    ResponseFormat::Json => CoverResponse::Metadata(CoverMetadata {
                        ok: false,
                        isbn: None,
                        source: CoverSource::Error,
                        cover_url: self.resolver.placeholder_url().to_string(),
                    }),
                    ResponseFormat::Image => {
                        CoverResponse::Image(self.responder.placeholder(CoverSource::Error).await)
                    }
                }
            }
        }
    }

    async fn run(&self, query: &CoverQuery) -> CoverResponse {
        let resolution = self.resolver.resolve(query).await;
        match query.format {
            ResponseFormat::Json => CoverResponse::Metadata(CoverMetadata::from(&resolution)),
            ResponseFormat::Image => CoverResponse::Image(self.responder.serve(&resolution).await),
        }
    }
}
