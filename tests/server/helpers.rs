use std::sync::Arc;
use std::time::Duration;

use bookshelf::application::routes::app_router;
use bookshelf::application::state::{AppState, AppStateConfig, CoverConfig};
use bookshelf::domain::books::{Book, NewBook};
use bookshelf::domain::repositories::BookRepository;
use bookshelf::infrastructure::database::Database;
use reqwest::Client;
use reqwest::Url;
use tokio::net::TcpListener;
use tokio::task::AbortHandle;

pub const PLACEHOLDER_PATH: &str = "/placeholder.png";
pub const PLACEHOLDER_BYTES: &[u8] = b"placeholder-image";

pub struct TestApp {
    pub address: String,
    #[allow(dead_code)]
    pub book_repo: Arc<dyn BookRepository>,
    #[allow(dead_code)]
    pub mock_server: Option<wiremock::MockServer>,
    server_handle: AbortHandle,
}

impl TestApp {
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.address, path)
    }

    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    #[allow(dead_code)]
    pub fn mock_server(&self) -> &wiremock::MockServer {
        self.mock_server
            .as_ref()
            .expect("app was spawned without a mock server")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

/// App wired to the real cover providers. Only use for routes that never reach them.
pub async fn spawn_app() -> TestApp {
    spawn_app_inner(AppStateConfig::default(), None).await
}

/// App whose cover providers, cover image host and placeholder all live on one mock server.
pub async fn spawn_app_with_mocks() -> TestApp {
    let mock_server = wiremock::MockServer::start().await;
    let uri = mock_server.uri();

    let covers = CoverConfig {
        google_books_url: Url::parse(&format!("{uri}/books/v1/volumes"))
            .expect("valid mock Google Books URL"),
        google_books_api_key: None,
        open_library_search_url: Url::parse(&format!("{uri}/search.json"))
            .expect("valid mock Open Library URL"),
        open_library_covers_url: Url::parse(&format!("{uri}/b/"))
            .expect("valid mock covers URL"),
        placeholder_url: format!("{uri}{PLACEHOLDER_PATH}"),
        provider_timeout: Duration::from_secs(2),
    };

    spawn_app_inner(AppStateConfig { covers }, Some(mock_server)).await
}

async fn spawn_app_inner(
    config: AppStateConfig,
    mock_server: Option<wiremock::MockServer>,
) -> TestApp {
    let database = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    let state = AppState::from_database(&database, config);
    let book_repo = state.book_repo.clone();

    let app = app_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");

    let local_addr = listener.local_addr().expect("Failed to get local address");
    let address = format!("http://{}", local_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    })
    .abort_handle();

    TestApp {
        address,
        book_repo,
        mock_server,
        server_handle,
    }
}

/// POST a book and return the stored record.
#[allow(dead_code)]
pub async fn create_book(app: &TestApp, title: &str, description: &str) -> Book {
    let payload = NewBook {
        title: title.to_string(),
        description: description.to_string(),
        image_url: None,
    };

    let response = Client::new()
        .post(app.api_url("/books"))
        .json(&payload)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create book {title}: {e}"));

    assert_eq!(response.status(), 201);

    response
        .json()
        .await
        .unwrap_or_else(|e| panic!("failed to deserialize book {title}: {e}"))
}
