//! Book catalog service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookPayload, BookQuery, BookSummary},
    repository::Repository,
};

/// Interpret a query flag the way a numeric cast followed by a boolean test would:
/// any non-zero number is true, zero and anything non-numeric are false.
pub fn numeric_truthiness(raw: &str) -> bool {
    let value = raw.trim();
    if value.is_empty() {
        return false;
    }

    if let Some(truthy) = radix_truthiness(value) {
        return truthy;
    }

    let unsigned = value
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(value);
    if unsigned == "Infinity" {
        return true;
    }

    // f64 parsing also accepts "inf" and "nan", which must stay false here
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return false;
    }

    value.parse::<f64>().map(|n| n != 0.0).unwrap_or(false)
}

fn radix_truthiness(value: &str) -> Option<bool> {
    let radix = match value.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => return None,
    };
    let digits = &value[2..];

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(false);
    }
    Some(digits.chars().any(|c| c != '0'))
}

/// Conjunctive list filter, evaluated name, then reading, then finished
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookFilter {
    name: Option<String>,
    reading: Option<bool>,
    finished: Option<bool>,
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        Self {
            name: query.name.as_deref().map(str::to_lowercase),
            reading: query.reading.as_deref().map(numeric_truthiness),
            finished: query.finished.as_deref().map(numeric_truthiness),
        }
    }
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        self.matches_name(book) && self.matches_reading(book) && self.matches_finished(book)
    }

    fn matches_name(&self, book: &Book) -> bool {
        match &self.name {
            Some(needle) => book.name.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }

    fn matches_reading(&self, book: &Book) -> bool {
        self.reading.map_or(true, |reading| book.reading == reading)
    }

    fn matches_finished(&self, book: &Book) -> bool {
        self.finished.map_or(true, |finished| book.finished == finished)
    }
}

/// Check a create/update payload. A missing name is reported before page progress.
///
/// `action` is the verb used in the client-facing message ("add", "update").
fn validate_payload(payload: &BookPayload, action: &str) -> AppResult<()> {
    let Err(errors) = payload.validate() else {
        return Ok(());
    };

    let message = if errors.field_errors().contains_key("name") {
        format!("Failed to {} book. Please provide the book name", action)
    } else {
        format!(
            "Failed to {} book. readPage cannot be greater than pageCount",
            action
        )
    };
    tracing::debug!(action, %message, "Rejected book payload");
    Err(AppError::Validation(message))
}

fn decode_payload(body: &[u8]) -> AppResult<BookPayload> {
    serde_json::from_slice(body).map_err(|e| {
        AppError::BadRequest(format!("Failed to parse the request body: {}", e))
    })
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book and return its generated id
    pub async fn create(&self, payload: &BookPayload) -> AppResult<String> {
        validate_payload(payload, "add")?;

        let now = Utc::now();
        let id = self
            .repository
            .books
            .insert_with(|id| Book::new(id, payload, now))
            .await?;

        tracing::info!(book_id = %id, "Book added");
        Ok(id)
    }

    /// List book projections matching every provided filter
    pub async fn list(&self, query: &BookQuery) -> Vec<BookSummary> {
        let filter = BookFilter::from(query);
        self.repository
            .books
            .list_summaries(|book| filter.matches(book))
            .await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await.ok_or_else(|| {
            tracing::debug!(book_id = %id, "Book not found");
            AppError::NotFound("Book not found".to_string())
        })
    }

    /// Replace every writable field of an existing book.
    ///
    /// An unknown id wins over an invalid payload.
    pub async fn update(&self, id: &str, payload: &BookPayload) -> AppResult<()> {
        self.update_from(id, || Ok(payload.clone())).await
    }

    /// Same as [`update`](Self::update), decoding a raw JSON body after the lookup
    pub async fn update_json(&self, id: &str, body: &[u8]) -> AppResult<()> {
        self.update_from(id, || decode_payload(body)).await
    }

    async fn update_from<F>(&self, id: &str, payload: F) -> AppResult<()>
    where
        F: FnOnce() -> AppResult<BookPayload>,
    {
        let now = Utc::now();
        let found = self
            .repository
            .books
            .update_with(id, |current| {
                let payload = payload()?;
                validate_payload(&payload, "update")?;
                let mut updated = current.clone();
                updated.apply(&payload, now);
                Ok(updated)
            })
            .await?;

        if !found {
            tracing::debug!(book_id = %id, "Update target not found");
            return Err(AppError::NotFound(
                "Failed to update book. Id not found".to_string(),
            ));
        }

        tracing::info!(book_id = %id, "Book updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        match self.repository.books.remove(id).await {
            Some(_) => {
                tracing::info!(book_id = %id, "Book deleted");
                Ok(())
            }
            None => {
                tracing::debug!(book_id = %id, "Delete target not found");
                Err(AppError::NotFound(
                    "Failed to delete book. Id not found".to_string(),
                ))
            }
        }
    }

    /// Number of books on the shelf (for readiness)
    pub async fn count(&self) -> usize {
        self.repository.books.count().await
    }
}
