use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::books::NewBook;
use crate::domain::ids::BookId;
use crate::infrastructure::client::BookshelfClient;

#[derive(Debug, Subcommand)]
pub enum BookCommands {
    /// Add a new book
    Add(AddBookCommand),
    /// List all books, newest first
    List,
    /// Get a book by ID
    Get(BookIdArgs),
    /// Delete a book
    Delete(BookIdArgs),
}

pub async fn run(client: &BookshelfClient, cmd: BookCommands) -> Result<()> {
    match cmd {
        BookCommands::Add(c) => add_book(client, c).await,
        BookCommands::List => print_json(&client.books().list().await?),
        BookCommands::Get(c) => print_json(&client.books().get(&BookId::new(c.id)).await?),
        BookCommands::Delete(c) => {
            client.books().delete(&BookId::new(c.id.clone())).await?;
            eprintln!("Deleted book {}", c.id);
            Ok(())
        }
    }
}

#[derive(Debug, Args)]
pub struct AddBookCommand {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    /// Cover image URL; defaults to a cover looked up by title
    #[arg(long)]
    pub image_url: Option<String>,
}

pub async fn add_book(client: &BookshelfClient, command: AddBookCommand) -> Result<()> {
    let payload = NewBook {
        title: command.title,
        description: command.description,
        image_url: command.image_url,
    };

    let book = client.books().create(&payload).await?;
    print_json(&book)
}

#[derive(Debug, Args)]
pub struct BookIdArgs {
    #[arg(long)]
    pub id: String,
}
