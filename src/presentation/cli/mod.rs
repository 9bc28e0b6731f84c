pub mod books;
pub mod covers;

use std::net::SocketAddr;
use std::time::Duration;

use books::BookCommands;
use clap::{Args, Parser, Subcommand};
use covers::CoverCommands;
use reqwest::Url;

use crate::application::state::CoverConfig;
use crate::infrastructure::covers::PLACEHOLDER_URL;
use crate::infrastructure::covers::google_books::GOOGLE_BOOKS_URL;
use crate::infrastructure::covers::open_library::OPEN_LIBRARY_SEARCH_URL;
use crate::infrastructure::covers::templates::OPEN_LIBRARY_COVERS_URL;

#[derive(Debug, Parser)]
#[command(author, version, about = "Catalogue books and their covers", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "BOOKSHELF_URL",
        default_value = "http://localhost:3000"
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Manage books
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },

    /// Look up book covers
    Cover {
        #[command(subcommand)]
        command: CoverCommands,
    },
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(
        long,
        env = "BOOKSHELF_DATABASE_URL",
        default_value = "sqlite://bookshelf.db"
    )]
    pub database_url: String,

    #[arg(long, env = "BOOKSHELF_BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: SocketAddr,

    /// Optional key for Google Books; unauthenticated calls are rate-limited
    #[arg(long, env = "GOOGLE_BOOKS_API_KEY")]
    pub google_books_api_key: Option<String>,

    /// Timeout in seconds for each call to a metadata provider or image host
    #[arg(long, env = "BOOKSHELF_PROVIDER_TIMEOUT_SECS", default_value_t = 5)]
    pub provider_timeout_secs: u64,

    #[arg(long, env = "BOOKSHELF_GOOGLE_BOOKS_URL", default_value = GOOGLE_BOOKS_URL)]
    pub google_books_url: Url,

    #[arg(
        long,
        env = "BOOKSHELF_OPEN_LIBRARY_SEARCH_URL",
        default_value = OPEN_LIBRARY_SEARCH_URL
    )]
    pub open_library_search_url: Url,

    #[arg(
        long,
        env = "BOOKSHELF_OPEN_LIBRARY_COVERS_URL",
        default_value = OPEN_LIBRARY_COVERS_URL
    )]
    pub open_library_covers_url: Url,

    #[arg(long, env = "BOOKSHELF_PLACEHOLDER_URL", default_value = PLACEHOLDER_URL)]
    pub placeholder_url: String,
}

impl ServeCommand {
    pub fn cover_config(&self) -> CoverConfig {
        CoverConfig {
            google_books_url: self.google_books_url.clone(),
            google_books_api_key: self
                .google_books_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            open_library_search_url: self.open_library_search_url.clone(),
            open_library_covers_url: self.open_library_covers_url.clone(),
            placeholder_url: self.placeholder_url.clone(),
            provider_timeout: Duration::from_secs(self.provider_timeout_secs.max(1)),
        }
    }
}

pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
