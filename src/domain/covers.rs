use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Path of the cover endpoint, used when building links stored on books.
pub const COVER_ENDPOINT: &str = "/api/cover";

/// Requested cover size. Open Library understands `S`, `M` and `L`; any other
/// code is passed through upper-cased and left for the image host to reject.
/// A blank code means the default size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoverSize {
    Small,
    #[default]
    Medium,
    Large,
    Other(String),
}

impl CoverSize {
    pub fn code(&self) -> &str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
            CoverSize::Other(code) => code,
        }
    }
}

impl From<&str> for CoverSize {
    fn from(value: &str) -> Self {
        let upper = value.trim().to_uppercase();
        match upper.as_str() {
            "S" => CoverSize::Small,
            "M" => CoverSize::Medium,
            "L" => CoverSize::Large,
            "" => CoverSize::default(),
            _ => CoverSize::Other(upper),
        }
    }
}

impl fmt::Display for CoverSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Image,
    Json,
}

impl From<&str> for ResponseFormat {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            ResponseFormat::Json
        } else {
            ResponseFormat::Image
        }
    }
}

/// Input of the cover pipeline. Blank ISBN or title values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverQuery {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub size: CoverSize,
    pub format: ResponseFormat,
}

impl CoverQuery {
    pub fn new(isbn: Option<String>, title: Option<String>) -> Self {
        Self {
            isbn: non_blank(isbn),
            title: non_blank(title),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: CoverSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Relative link to the cover endpoint for a title, as stored on new books.
pub fn cover_link(title: &str, size: &CoverSize) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("title", title)
        .append_pair("size", size.code())
        .finish();
    format!("{COVER_ENDPOINT}?{query}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GoogleBooks,
    OpenLibrary,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::GoogleBooks => "google-books",
            Provider::OpenLibrary => "open-library",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a title search found. Providers omit fields freely, so everything is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMatch {
    pub provider: Provider,
    pub isbn: Option<String>,
    pub thumbnail_url: Option<String>,
    pub cover_id: Option<i64>,
}

impl ProviderMatch {
    pub fn empty(provider: Provider) -> Self {
        Self {
            provider,
            isbn: None,
            thumbnail_url: None,
            cover_id: None,
        }
    }
}

/// A bibliographic provider searchable by free-text title.
///
/// Implementations make a single attempt and report every failure as `None`.
#[async_trait]
pub trait TitleSearch: Send + Sync {
    fn provider(&self) -> Provider;

    async fn search(&self, title: &str) -> Option<ProviderMatch>;
}

/// Which step of the pipeline produced the cover URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverStrategy {
    DirectIsbn,
    GoogleThumbnail,
    GoogleIsbn,
    OpenLibraryIsbn,
    OpenLibraryCoverId,
    Placeholder,
}

impl CoverStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            CoverStrategy::DirectIsbn => "direct-isbn",
            CoverStrategy::GoogleThumbnail => "title-via-google-thumbnail",
            CoverStrategy::GoogleIsbn => "title-via-google-isbn",
            CoverStrategy::OpenLibraryIsbn => "title-via-openlibrary-isbn",
            CoverStrategy::OpenLibraryCoverId => "title-via-openlibrary-id",
            CoverStrategy::Placeholder => "none",
        }
    }

    /// Tag reported to callers. Every template-built URL points at Open Library covers.
    pub fn source(self) -> CoverSource {
        match self {
            CoverStrategy::GoogleThumbnail => CoverSource::Google,
            CoverStrategy::DirectIsbn
            | CoverStrategy::GoogleIsbn
            | CoverStrategy::OpenLibraryIsbn
            | CoverStrategy::OpenLibraryCoverId => CoverSource::OpenLibrary,
            CoverStrategy::Placeholder => CoverSource::None,
        }
    }
}

impl fmt::Display for CoverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSource {
    Google,
    OpenLibrary,
    Direct,
    None,
    Error,
}

impl CoverSource {
    pub fn as_str(self) -> &'static str {
        match self {
            CoverSource::Google => "google",
            CoverSource::OpenLibrary => "openlibrary",
            CoverSource::Direct => "direct",
            CoverSource::None => "none",
            CoverSource::Error => "error",
        }
    }
}

impl fmt::Display for CoverSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the resolver. `cover_url` is always set, falling back to the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub cover_url: String,
    pub isbn: Option<String>,
    pub strategy: CoverStrategy,
}

impl Resolution {
    pub fn placeholder(url: impl Into<String>) -> Self {
        Self {
            cover_url: url.into(),
            isbn: None,
            strategy: CoverStrategy::Placeholder,
        }
    }

    pub fn source(&self) -> CoverSource {
        self.strategy.source()
    }

    pub fn is_resolved(&self) -> bool {
        self.strategy != CoverStrategy::Placeholder
    }
}

/// JSON body returned in metadata mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverMetadata {
    pub ok: bool,
    pub isbn: Option<String>,
    pub source: CoverSource,
    pub cover_url: String,
}

impl From<&Resolution> for CoverMetadata {
    fn from(resolution: &Resolution) -> Self {
        Self {
            ok: resolution.is_resolved(),
            isbn: resolution.isbn.clone(),
            source: resolution.source(),
            cover_url: resolution.cover_url.clone(),
        }
    }
}
