pub(crate) mod books;
pub(crate) mod covers;

use axum::routing::get;

use crate::application::state::AppState;

pub(super) fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/cover", get(covers::get_cover))
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/{id}",
            get(books::get_book).delete(books::delete_book),
        )
}
