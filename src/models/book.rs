//! Book model and related types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Full book record as stored on the shelf
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque 16-character identifier
    pub id: String,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
    /// True when every page has been read
    pub finished: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub inserted_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_millis")]
    pub updated_at: DateTime<Utc>,
}

/// RFC 3339 with millisecond precision and a `Z` suffix
fn serialize_millis<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl Book {
    /// Build a fresh record from a validated payload.
    ///
    /// `payload.name` must already be checked for presence.
    pub fn new(id: String, payload: &BookPayload, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: payload.name.clone().unwrap_or_default(),
            year: payload.year,
            author: payload.author.clone(),
            summary: payload.summary.clone(),
            publisher: payload.publisher.clone(),
            page_count: payload.page_count,
            read_page: payload.read_page,
            reading: payload.reading,
            finished: payload.is_finished(),
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every client-writable field, keeping `id` and `inserted_at`.
    pub fn apply(&mut self, payload: &BookPayload, now: DateTime<Utc>) {
        self.name = payload.name.clone().unwrap_or_default();
        self.year = payload.year;
        self.author = payload.author.clone();
        self.summary = payload.summary.clone();
        self.publisher = payload.publisher.clone();
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.reading = payload.reading;
        self.finished = payload.is_finished();
        self.updated_at = now;
    }

    pub fn summary_view(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Create / update book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_page_progress", skip_on_field_errors = false))]
pub struct BookPayload {
    /// Book title. Required, though an empty string is accepted; `null` counts as missing
    #[validate(required)]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    #[serde(default)]
    pub page_count: u32,
    /// Must not exceed `pageCount`
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

impl BookPayload {
    pub fn is_finished(&self) -> bool {
        self.page_count == self.read_page
    }
}

fn validate_page_progress(payload: &BookPayload) -> Result<(), ValidationError> {
    if payload.read_page > payload.page_count {
        return Err(ValidationError::new("read_page_exceeds_page_count"));
    }
    Ok(())
}

/// Book projection returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<String>,
}

/// Query parameters for listing books
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// Numeric flag: "1" keeps books being read, "0" keeps the others
    pub reading: Option<String>,
    /// Numeric flag: "1" keeps finished books, "0" keeps the others
    pub finished: Option<String>,
}

impl BookQuery {
    /// Build the query from raw `key=value` pairs.
    ///
    /// A repeated key keeps all its values joined with `,`, so `reading=1&reading=0`
    /// reads as the non-numeric flag `"1,0"`. Unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            if let Some(existing) = slot.as_mut() {
                existing.push(',');
                existing.push_str(&value);
            } else {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Payload of a successful create
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCreated {
    pub book_id: String,
}

/// Payload of a successful list
#[derive(Debug, Serialize, ToSchema)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

/// Payload of a successful lookup
#[derive(Debug, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: Book,
}
