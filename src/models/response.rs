//! Uniform response envelope

use serde::Serialize;
use utoipa::ToSchema;

use super::book::{BookCreated, BookDetail, BookList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Operation completed
    Success,
    /// Client error, nothing was changed
    Fail,
    /// Server error
    Error,
}

/// Empty data marker for message-only responses
#[derive(Debug, Serialize, ToSchema)]
pub struct NoData {}

/// `{status, message?, data?}` wrapper used by every book endpoint
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    MessageResponse = ApiResponse<NoData>,
    BookCreatedResponse = ApiResponse<BookCreated>,
    BookListResponse = ApiResponse<BookList>,
    BookDetailResponse = ApiResponse<BookDetail>
)]
pub struct ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<NoData> {
    pub fn message(status: ResponseStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            data: None,
        }
    }
}
