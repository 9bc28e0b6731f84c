use anyhow::Result;

use super::BookshelfClient;
use crate::domain::books::{Book, NewBook};
use crate::domain::ids::BookId;

const BOOKS_PATH: &str = "api/books";

pub struct BooksClient<'a> {
    client: &'a BookshelfClient,
}

impl<'a> BooksClient<'a> {
    pub fn new(client: &'a BookshelfClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, payload: &NewBook) -> Result<Book> {
        let url = self.client.endpoint(BOOKS_PATH)?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .json(payload)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn list(&self) -> Result<Vec<Book>> {
        let url = self.client.endpoint(BOOKS_PATH)?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn get(&self, id: &BookId) -> Result<Book> {
        let url = self.client.endpoint(&format!("{BOOKS_PATH}/{id}"))?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn delete(&self, id: &BookId) -> Result<()> {
        let url = self.client.endpoint(&format!("{BOOKS_PATH}/{id}"))?;
        let response = self
            .client
            .request(reqwest::Method::DELETE, url)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.client.response_error(response).await)
        }
    }
}
