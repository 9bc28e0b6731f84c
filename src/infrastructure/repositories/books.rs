use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

use crate::domain::RepositoryError;
use crate::domain::books::{Book, NewBook};
use crate::domain::ids::BookId;
use crate::domain::repositories::BookRepository;
use crate::infrastructure::database::DatabasePool;

#[derive(Clone)]
pub struct SqlBookRepository {
    pool: DatabasePool,
}

impl SqlBookRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_book(record: BookRecord) -> Book {
        Book {
            id: BookId::from(record.id),
            title: record.title,
            description: record.description,
            image_url: record.image_url,
            created_at: record.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookRecord {
    id: String,
    title: String,
    description: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn insert(&self, new_book: NewBook) -> Result<Book, RepositoryError> {
        let id = BookId::generate();

        let record = query_as::<_, BookRecord>(
            r"INSERT INTO books (id, title, description, image_url, created_at)
              VALUES (?, ?, ?, ?, ?)
              RETURNING id, title, description, image_url, created_at",
        )
        .bind(id.as_str())
        .bind(&new_book.title)
        .bind(&new_book.description)
        .bind(new_book.image_url.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_unique_violation()
            {
                return RepositoryError::conflict(format!("book {id} already exists"));
            }
            RepositoryError::unexpected(err.to_string())
        })?;

        Ok(Self::into_book(record))
    }

    async fn get(&self, id: &BookId) -> Result<Book, RepositoryError> {
        let record = query_as::<_, BookRecord>(
            r"SELECT id, title, description, image_url, created_at FROM books WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::unexpected(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_book(record))
    }

    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        let records = query_as::<_, BookRecord>(
            r"SELECT id, title, description, image_url, created_at
              FROM books
              ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::unexpected(e.to_string()))?;

        Ok(records.into_iter().map(Self::into_book).collect())
    }

    async fn delete(&self, id: &BookId) -> Result<(), RepositoryError> {
        let result = query(r"DELETE FROM books WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
