use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use crate::application::services::{BookService, CoverResolver, CoverResponder, CoverService};
use crate::domain::covers::TitleSearch;
use crate::domain::repositories::BookRepository;
use crate::infrastructure::covers::google_books::GOOGLE_BOOKS_URL;
use crate::infrastructure::covers::open_library::OPEN_LIBRARY_SEARCH_URL;
use crate::infrastructure::covers::templates::OPEN_LIBRARY_COVERS_URL;
use crate::infrastructure::covers::{
    DEFAULT_PROVIDER_TIMEOUT, GoogleBooksClient, OpenLibraryClient, OpenLibraryCovers,
    PLACEHOLDER_URL,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::repositories::books::SqlBookRepository;

/// Where the cover pipeline looks things up. Production uses the public
/// services; tests point every URL at a mock server.
#[derive(Debug, Clone)]
pub struct CoverConfig {
    pub google_books_url: Url,
    pub google_books_api_key: Option<String>,
    pub open_library_search_url: Url,
    pub open_library_covers_url: Url,
    pub placeholder_url: String,
    /// Upper bound for every outbound call: each title search and each image fetch.
    pub provider_timeout: Duration,
}

impl Default for CoverConfig {
    #[allow(clippy::expect_used)] // Constant URLs
    fn default() -> Self {
        Self {
            google_books_url: Url::parse(GOOGLE_BOOKS_URL).expect("valid Google Books URL"),
            google_books_api_key: None,
            open_library_search_url: Url::parse(OPEN_LIBRARY_SEARCH_URL)
                .expect("valid Open Library search URL"),
            open_library_covers_url: Url::parse(OPEN_LIBRARY_COVERS_URL)
                .expect("valid Open Library covers URL"),
            placeholder_url: PLACEHOLDER_URL.to_string(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// Everything that varies between production and test environments.
/// Repositories and services are created from the database pool.
#[derive(Debug, Clone, Default)]
pub struct AppStateConfig {
    pub covers: CoverConfig,
}

#[derive(Clone)]
pub struct AppState {
    pub book_repo: Arc<dyn BookRepository>,
    pub book_service: BookService,
    pub cover_service: CoverService,
}

impl AppState {
    /// Build the full application state from a database connection and config.
    pub fn from_database(database: &Database, config: AppStateConfig) -> Self {
        let book_repo: Arc<dyn BookRepository> =
            Arc::new(SqlBookRepository::new(database.clone_pool()));
        Self::new(book_repo, config)
    }

    pub fn new(book_repo: Arc<dyn BookRepository>, config: AppStateConfig) -> Self {
        #[allow(clippy::expect_used)]
        let http_client = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        let cover_service = build_cover_service(&http_client, config.covers);
        let book_service = BookService::new(Arc::clone(&book_repo));

        Self {
            book_repo,
            book_service,
            cover_service,
        }
    }
}

fn build_cover_service(http: &reqwest::Client, config: CoverConfig) -> CoverService {
    let google: Arc<dyn TitleSearch> = Arc::new(
        GoogleBooksClient::new(
            http.clone(),
            config.google_books_url,
            config.google_books_api_key,
        )
        .with_timeout(config.provider_timeout),
    );
    let open_library: Arc<dyn TitleSearch> = Arc::new(
        OpenLibraryClient::new(http.clone(), config.open_library_search_url)
            .with_timeout(config.provider_timeout),
    );

    let resolver = CoverResolver::new(
        google,
        open_library,
        OpenLibraryCovers::new(config.open_library_covers_url),
        config.placeholder_url.clone(),
    );
    let responder = CoverResponder::new(
        http.clone(),
        config.placeholder_url,
        config.provider_timeout,
    );

    CoverService::new(resolver, responder)
}
