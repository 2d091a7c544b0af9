use serde::{Deserialize, Serialize};

pub type BookId = i64;

/// Genre bucket a book is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookType {
    Fiction,
    NonFiction,
}

impl BookType {
    pub const ALLOWED: &'static str = "fiction, non-fiction";

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fiction" => Some(BookType::Fiction),
            "non-fiction" => Some(BookType::NonFiction),
            _ => None,
        }
    }
}

/// Catalog entry. Extended fields are only exposed by the single-book lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    #[serde(rename = "type")]
    pub book_type: BookType,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(
        default,
        rename = "current-stock",
        alias = "stock",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_stock: Option<u32>,
}

/// Projection returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub id: BookId,
    pub name: String,
    #[serde(rename = "type")]
    pub book_type: BookType,
    pub available: bool,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            name: book.name.clone(),
            book_type: book.book_type,
            available: book.available,
        }
    }
}

/// Raw query parameters of `GET /books`; validated by `BookQuery::parse`.
#[derive(Debug, Default)]
pub struct ListBooksParams {
    pub book_type: Option<String>,
    pub limit: Option<String>,
}
