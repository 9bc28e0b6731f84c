use reqwest::Url;

use crate::domain::covers::CoverSize;

pub const OPEN_LIBRARY_COVERS_URL: &str = "https://covers.openlibrary.org/b/";

/// Deterministic Open Library cover URLs. Building one never touches the network;
/// a missing cover only shows up when the image is fetched.
#[derive(Debug, Clone)]
pub struct OpenLibraryCovers {
    base: Url,
}

impl OpenLibraryCovers {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn by_isbn(&self, isbn: &str, size: &CoverSize) -> String {
        self.build("isbn", &format!("{isbn}-{size}.jpg"))
    }

    pub fn by_id(&self, cover_id: i64, size: &CoverSize) -> String {
        self.build("id", &format!("{cover_id}-{size}.jpg"))
    }

    fn build(&self, kind: &str, file: &str) -> String {
        let mut url = self.base.clone();
        // A base URL that cannot hold path segments (e.g. `data:`) is returned unchanged.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(kind).push(file);
        }
        url.into()
    }
}

impl Default for OpenLibraryCovers {
    #[allow(clippy::expect_used)] // Constant URL
    fn default() -> Self {
        Self::new(Url::parse(OPEN_LIBRARY_COVERS_URL).expect("valid Open Library covers URL"))
    }
}
