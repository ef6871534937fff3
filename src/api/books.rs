//! Book catalog endpoints

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{BookCreated, BookDetail, BookList},
        ApiResponse, BookPayload, BookQuery, NoData, ResponseStatus,
    },
};

use super::AppJson;

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = BookCreatedResponse),
        (status = 400, description = "Missing name or readPage greater than pageCount", body = MessageResponse),
        (status = 500, description = "Book could not be stored", body = MessageResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AppJson(payload): AppJson<BookPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookCreated>>)> {
    let book_id = state.services.books.create(&payload).await?;
    let body = ApiResponse::success(BookCreated { book_id }).with_message("Book added successfully");
    Ok((StatusCode::CREATED, Json(body)))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<ApiResponse<BookList>> {
    let query = BookQuery::from_pairs(pairs);
    let books = state.services.books.list(&query).await;
    Json(ApiResponse::success(BookList { books }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetailResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<BookDetail>>> {
    let book = state.services.books.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(BookDetail { book })))
}

/// Replace a book's fields
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Missing name or readPage greater than pageCount", body = MessageResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<NoData>>> {
    // Decoded by the service only once the id is known to exist
    state.services.books.update_json(&id, &body).await?;
    Ok(Json(ApiResponse::<NoData>::message(
        ResponseStatus::Success,
        "Book updated successfully",
    )))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<NoData>>> {
    state.services.books.delete(&id).await?;
    Ok(Json(ApiResponse::<NoData>::message(
        ResponseStatus::Success,
        "Book deleted successfully",
    )))
}
