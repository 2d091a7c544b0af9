use std::collections::HashSet;

use anyhow::Context;
use folio_db::SnapshotStore;
use thiserror::Error;

use super::models::{Book, BookId, BookSummary, BookType, ListBooksParams};

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 20;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid value for query parameter 'type'. Must be one of: {}.", BookType::ALLOWED)]
    InvalidType,

    #[error(
        "Invalid value for query parameter 'limit'. Must be between {} and {}.",
        MIN_LIMIT,
        MAX_LIMIT
    )]
    InvalidLimit,
}

/// Validated filter for listing books.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub book_type: Option<BookType>,
    pub limit: Option<usize>,
}

impl BookQuery {
    /// An empty `type` is treated as absent; `limit` must be an integer in range.
    pub fn parse(params: &ListBooksParams) -> Result<Self, QueryError> {
        let book_type = match params.book_type.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(BookType::parse(raw).ok_or(QueryError::InvalidType)?),
        };

        let limit = match params.limit.as_deref() {
            None => None,
            Some(raw) => {
                let limit: i64 = raw.trim().parse().map_err(|_| QueryError::InvalidLimit)?;
                if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
                    return Err(QueryError::InvalidLimit);
                }
                Some(limit as usize)
            }
        };

        Ok(Self { book_type, limit })
    }

    /// Parse raw query pairs. Unknown keys are ignored; a repeated `type` or
    /// `limit` is rejected with that parameter's error.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, QueryError> {
        let mut params = ListBooksParams::default();
        for (key, value) in pairs {
            let (slot, err) = match key.as_str() {
                "type" => (&mut params.book_type, QueryError::InvalidType),
                "limit" => (&mut params.limit, QueryError::InvalidLimit),
                _ => continue,
            };
            if slot.replace(value.clone()).is_some() {
                return Err(err);
            }
        }
        Self::parse(&params)
    }
}

/// The read-only set of orderable books.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate book ids.
    pub fn new(books: Vec<Book>) -> anyhow::Result<Self> {
        let mut seen = HashSet::with_capacity(books.len());
        if let Some(duplicate) = books.iter().find(|book| !seen.insert(book.id)) {
            anyhow::bail!("duplicate book id {} in catalog", duplicate.id);
        }
        Ok(Self { books })
    }

    pub async fn load(store: &dyn SnapshotStore<Book>) -> anyhow::Result<Self> {
        let books = store
            .load()
            .await
            .with_context(|| format!("failed to load catalog from {}", store.describe()))?;
        Self::new(books)
    }

    pub fn list(&self, query: &BookQuery) -> Vec<BookSummary> {
        self.books
            .iter()
            .filter(|book| query.book_type.map_or(true, |t| book.book_type == t))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(BookSummary::from)
            .collect()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
