//! Data models for the bookshelf

pub mod book;
pub mod response;

// Re-export commonly used types
pub use book::{Book, BookPayload, BookQuery, BookSummary};
pub use response::{ApiResponse, NoData, ResponseStatus};
