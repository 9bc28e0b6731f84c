mod books;
pub mod covers;

pub use books::BookService;
pub use covers::{CoverResolver, CoverResponder, CoverResponse, CoverService, ServedCover};
