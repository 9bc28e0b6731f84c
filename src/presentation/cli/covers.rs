use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::covers::CoverSize;
use crate::infrastructure::client::BookshelfClient;

#[derive(Debug, Subcommand)]
pub enum CoverCommands {
    /// Show which cover the server resolves for an ISBN or title
    Resolve(ResolveCoverCommand),
}

pub async fn run(client: &BookshelfClient, cmd: CoverCommands) -> Result<()> {
    match cmd {
        CoverCommands::Resolve(c) => resolve_cover(client, c).await,
    }
}

#[derive(Debug, Args)]
pub struct ResolveCoverCommand {
    #[arg(long)]
    pub isbn: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    /// S, M or L
    #[arg(long, default_value = "M")]
    pub size: String,
}

pub async fn resolve_cover(client: &BookshelfClient, command: ResolveCoverCommand) -> Result<()> {
    if command.isbn.is_none() && command.title.is_none() {
        bail!("provide --isbn or --title");
    }

    let metadata = client
        .covers()
        .resolve(
            command.isbn.as_deref(),
            command.title.as_deref(),
            &CoverSize::from(command.size.as_str()),
        )
        .await?;
    print_json(&metadata)
}
