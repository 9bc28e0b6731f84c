use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::info;

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::books::{Book, NewBook};
use crate::domain::ids::BookId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewBookSubmission {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: Option<String>,
}

impl NewBookSubmission {
    fn into_new_book(self) -> Result<NewBook, AppError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(AppError::validation("title and description are required"));
        }

        Ok(NewBook {
            title: self.title,
            description: self.description,
            image_url: self.image_url,
        })
    }
}

#[tracing::instrument(skip(state))]
pub(crate) async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.book_repo.list().await?;
    Ok(Json(books))
}

#[tracing::instrument(skip(state, submission))]
pub(crate) async fn create_book(
    State(state): State<AppState>,
    Json(submission): Json<NewBookSubmission>,
) -> Result<Response, ApiError> {
    let new_book = submission.into_new_book()?;
    let book = state.book_service.create(new_book).await?;
    Ok((StatusCode::CREATED, Json(book)).into_response())
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state.book_repo.get(&BookId::new(id)).await?;
    Ok(Json(book))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = BookId::new(id);
    state.book_repo.delete(&id).await?;
    info!(book_id = %id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
