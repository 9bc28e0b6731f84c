use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::formatting::capitalize_words;
use crate::domain::ids::BookId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewBook {
    /// Trim every field and title-case the title.
    pub fn normalize(mut self) -> Self {
        self.title = capitalize_words(&self.title);
        self.description = self.description.trim().to_string();
        self.image_url = normalize_optional_field(self.image_url);
        self
    }
}

fn normalize_optional_field(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
