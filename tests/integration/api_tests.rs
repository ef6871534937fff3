//! API integration tests

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{create_router, AppConfig, AppState};

fn app() -> Router {
    create_router(AppState::new(AppConfig::default()))
}

/// Send one request through the router and decode the JSON body
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    send_request(app, request).await
}

/// Send a prebuilt request and decode the JSON body
async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, value)
}

async fn create(app: &Router, payload: Value) -> String {
    let (status, body) = send(app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["bookId"]
        .as_str()
        .expect("No book id in response")
        .to_string()
}

fn book(name: &str, page_count: u32, read_page: u32, reading: bool) -> Value {
    json!({
        "name": name,
        "year": 2010,
        "author": "John Doe",
        "summary": "Lorem ipsum dolor sit amet",
        "publisher": "Dicoding Indonesia",
        "pageCount": page_count,
        "readPage": read_page,
        "reading": reading
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_book() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(book("Harry Potter", 200, 200, false)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Book added successfully");

    let id = body["data"]["bookId"].as_str().expect("No book id");
    assert_eq!(id.len(), 16);

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let stored = &body["data"]["book"];
    assert_eq!(stored["id"], id);
    assert_eq!(stored["name"], "Harry Potter");
    assert_eq!(stored["finished"], true);
    assert_eq!(stored["reading"], false);
    assert_eq!(stored["insertedAt"], stored["updatedAt"]);
}

#[tokio::test]
async fn test_create_without_name() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "pageCount": 10, "readPage": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Failed to add book. Please provide the book name");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_create_with_read_page_beyond_page_count() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/books", Some(book("X", 100, 150, false))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Failed to add book. readPage cannot be greater than pageCount"
    );

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body["data"]["books"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_create_with_empty_name() {
    let app = app();
    let id = create(&app, book("", 10, 0, false)).await;

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(body["data"]["book"]["name"], "");
}

#[tokio::test]
async fn test_create_with_malformed_body() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "Negative", "pageCount": -5 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_list_books_projection() {
    let app = app();
    create(&app, book("Animal Farm", 100, 100, false)).await;
    create(&app, book("Dune", 400, 10, true)).await;

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let books = body["data"]["books"].as_array().expect("No books array");
    assert_eq!(books.len(), 2);
    for entry in books {
        let keys: Vec<_> = entry.as_object().expect("Not an object").keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        assert!(entry["id"].is_string());
        assert!(entry["name"].is_string());
        assert_eq!(entry["publisher"], "Dicoding Indonesia");
    }
}

#[tokio::test]
async fn test_list_books_filters() {
    let app = app();
    create(&app, book("Animal Farm", 100, 100, false)).await;
    create(&app, book("The ANIMAL Kingdom", 300, 20, true)).await;
    create(&app, book("Dune", 400, 10, true)).await;

    let names = |body: &Value| -> Vec<String> {
        body["data"]["books"]
            .as_array()
            .expect("No books array")
            .iter()
            .map(|b| b["name"].as_str().unwrap_or_default().to_string())
            .collect()
    };

    let (_, body) = send(&app, Method::GET, "/books?name=animal", None).await;
    assert_eq!(names(&body), vec!["Animal Farm", "The ANIMAL Kingdom"]);

    let (_, body) = send(&app, Method::GET, "/books?reading=1", None).await;
    assert_eq!(names(&body), vec!["The ANIMAL Kingdom", "Dune"]);

    let (_, body) = send(&app, Method::GET, "/books?reading=0", None).await;
    assert_eq!(names(&body), vec!["Animal Farm"]);

    let (_, body) = send(&app, Method::GET, "/books?finished=1", None).await;
    assert_eq!(names(&body), vec!["Animal Farm"]);

    let (_, body) = send(&app, Method::GET, "/books?finished=yes", None).await;
    assert_eq!(names(&body), vec!["The ANIMAL Kingdom", "Dune"]);

    let (_, body) = send(&app, Method::GET, "/books?name=animal&reading=1&finished=0", None).await;
    assert_eq!(names(&body), vec!["The ANIMAL Kingdom"]);
}

#[tokio::test]
async fn test_get_unknown_book() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/books/does-not-exist", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn test_update_book() {
    let app = app();
    let id = create(&app, book("Draft", 100, 10, true)).await;
    let (_, before) = send(&app, Method::GET, &format!("/books/{}", id), None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(book("Final", 120, 120, false)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Book updated successfully");
    assert!(body.get("data").is_none());

    let (_, after) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    let updated = &after["data"]["book"];
    assert_eq!(updated["name"], "Final");
    assert_eq!(updated["pageCount"], 120);
    assert_eq!(updated["finished"], true);
    assert_eq!(updated["insertedAt"], before["data"]["book"]["insertedAt"]);
}

#[tokio::test]
async fn test_update_validation() {
    let app = app();
    let id = create(&app, book("Draft", 100, 10, true)).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "pageCount": 100, "readPage": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to update book. Please provide the book name");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(book("Draft", 10, 100, true)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Failed to update book. readPage cannot be greater than pageCount"
    );
}

#[tokio::test]
async fn test_update_unknown_book_reports_not_found_first() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/does-not-exist",
        Some(json!({ "pageCount": 1, "readPage": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Failed to update book. Id not found");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/does-not-exist",
        Some(json!({ "name": "X", "pageCount": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Failed to update book. Id not found");

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/books/does-not-exist")
        .body(Body::from(r#"{"name":"X"}"#))
        .expect("Failed to build request");
    let (status, body) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Failed to update book. Id not found");
}

#[tokio::test]
async fn test_update_with_malformed_body() {
    let app = app();
    let id = create(&app, book("Draft", 100, 10, true)).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "name": "X", "pageCount": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(body["data"]["book"]["name"], "Draft");
}

#[tokio::test]
async fn test_list_books_with_repeated_flag() {
    let app = app();
    create(&app, book("Animal Farm", 100, 100, false)).await;
    create(&app, book("Dune", 400, 10, true)).await;

    let (status, body) = send(&app, Method::GET, "/books?reading=1&reading=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let books = body["data"]["books"].as_array().expect("No books array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["name"], "Animal Farm");
}

#[tokio::test]
async fn test_create_with_null_name() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": null, "pageCount": 10, "readPage": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to add book. Please provide the book name");
}

#[tokio::test]
async fn test_timestamps_have_millisecond_precision() {
    let app = app();
    let id = create(&app, book("Dune", 10, 0, false)).await;

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    let inserted_at = body["data"]["book"]["insertedAt"]
        .as_str()
        .expect("No insertedAt");
    // YYYY-MM-DDTHH:MM:SS.mmmZ
    assert_eq!(inserted_at.len(), 24);
    assert!(inserted_at.ends_with('Z'));
    assert_eq!(&inserted_at[19..20], ".");
}

#[tokio::test]
async fn test_delete_book() {
    let app = app();
    let id = create(&app, book("Ephemeral", 1, 0, true)).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Book deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Failed to delete book. Id not found");
}

#[tokio::test]
async fn test_readiness_reports_shelf_size() {
    let app = app();
    create(&app, book("One", 1, 1, false)).await;

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"], 1);
}
