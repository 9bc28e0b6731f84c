use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::books::{Book, NewBook};
use crate::domain::ids::BookId;

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn insert(&self, book: NewBook) -> Result<Book, RepositoryError>;
    async fn get(&self, id: &BookId) -> Result<Book, RepositoryError>;
    /// All books, newest first.
    async fn list(&self) -> Result<Vec<Book>, RepositoryError>;
    async fn delete(&self, id: &BookId) -> Result<(), RepositoryError>;
}
