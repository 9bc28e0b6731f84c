use std::sync::Arc;

use tracing::info;

use crate::domain::books::{Book, NewBook};
use crate::domain::covers::{CoverSize, cover_link};
use crate::domain::errors::RepositoryError;
use crate::domain::repositories::BookRepository;

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// Store a new book. Without an explicit image the book links to the cover
    /// endpoint for its title, so the cover is resolved when the link is first loaded.
    pub async fn create(&self, new: NewBook) -> Result<Book, RepositoryError> {
        let raw_title = new.title.trim().to_string();
        let mut new = new.normalize();
        if new.image_url.is_none() && !raw_title.is_empty() {
            new.image_url = Some(cover_link(&raw_title, &CoverSize::Medium));
        }

        let book = self.books.insert(new).await?;
        info!(book_id = %book.id, title = %book.title, "book created");
        Ok(book)
    }
}
