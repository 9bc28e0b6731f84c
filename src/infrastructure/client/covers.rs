use anyhow::Result;

use super::BookshelfClient;
use crate::domain::covers::{CoverMetadata, CoverSize};

pub struct CoversClient<'a> {
    client: &'a BookshelfClient,
}

impl<'a> CoversClient<'a> {
    pub fn new(client: &'a BookshelfClient) -> Self {
        Self { client }
    }

    /// Ask the server which cover it would serve, without downloading the image.
    pub async fn resolve(
        &self,
        isbn: Option<&str>,
        title: Option<&str>,
        size: &CoverSize,
    ) -> Result<CoverMetadata> {
        let mut url = self.client.endpoint("api/cover")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(isbn) = isbn {
                pairs.append_pair("isbn", isbn);
            }
            if let Some(title) = title {
                pairs.append_pair("title", title);
            }
            pairs
                .append_pair("size", size.code())
                .append_pair("format", "json");
        }

        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }
}
