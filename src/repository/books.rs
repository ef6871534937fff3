//! In-memory book store

use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookSummary},
};

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";
const ID_LENGTH: usize = 16;

/// Generate a random URL-safe identifier
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Ordered sequence of book records, kept in insertion order
#[derive(Debug, Default)]
pub struct Shelf {
    books: Vec<Book>,
}

impl Shelf {
    pub fn append(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn find_index(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn replace_at(&mut self, index: usize, book: Book) {
        self.books[index] = book;
    }

    pub fn remove_at(&mut self, index: usize) -> Book {
        self.books.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Shared handle over the shelf. Every method holds the lock for its whole run.
#[derive(Clone, Default)]
pub struct BooksRepository {
    shelf: Arc<RwLock<Shelf>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the record built for a freshly generated, unused id.
    ///
    /// Fails with `Internal` if the record cannot be found right after the append.
    pub async fn insert_with<F>(&self, build: F) -> AppResult<String>
    where
        F: FnOnce(String) -> Book,
    {
        let mut shelf = self.shelf.write().await;

        let mut id = generate_id();
        while shelf.find_index(&id).is_some() {
            id = generate_id();
        }

        shelf.append(build(id.clone()));

        match shelf.find_index(&id) {
            Some(_) => Ok(id),
            None => Err(AppError::Internal("Failed to add book".to_string())),
        }
    }

    /// Project every record accepted by `keep`, in insertion order
    pub async fn list_summaries<F>(&self, keep: F) -> Vec<BookSummary>
    where
        F: Fn(&Book) -> bool,
    {
        let shelf = self.shelf.read().await;
        shelf
            .iter()
            .filter(|book| keep(book))
            .map(Book::summary_view)
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Book> {
        let shelf = self.shelf.read().await;
        shelf
            .find_index(id)
            .and_then(|index| shelf.get(index))
            .cloned()
    }

    /// Look the record up, then let `apply` validate and rebuild it.
    ///
    /// Returns `Ok(false)` when no record has this id. The shelf is untouched
    /// whenever `apply` fails.
    pub async fn update_with<F>(&self, id: &str, apply: F) -> AppResult<bool>
    where
        F: FnOnce(&Book) -> AppResult<Book>,
    {
        let mut shelf = self.shelf.write().await;

        let Some(index) = shelf.find_index(id) else {
            return Ok(false);
        };
        let Some(current) = shelf.get(index) else {
            return Ok(false);
        };

        let updated = apply(current)?;
        shelf.replace_at(index, updated);
        Ok(true)
    }

    /// Remove the record with this id, returning it if it existed
    pub async fn remove(&self, id: &str) -> Option<Book> {
        let mut shelf = self.shelf.write().await;
        shelf.find_index(id).map(|index| shelf.remove_at(index))
    }

    pub async fn count(&self) -> usize {
        self.shelf.read().await.len()
    }
}
