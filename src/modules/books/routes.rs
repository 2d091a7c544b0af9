use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use folio_http::error::AppError;

use super::catalog::{BookQuery, Catalog, QueryError};
use super::models::{Book, BookId, BookSummary};

const BOOK_NOT_FOUND: &str = "Book not found.";

/// `GET /books`: summaries filtered by `type` and truncated to `limit`
pub async fn list_books(
    State(catalog): State<Arc<Catalog>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<BookSummary>>, AppError> {
    let query = params
        .map_err(|_| QueryError::InvalidType)
        .and_then(|Query(pairs)| BookQuery::from_pairs(&pairs))
        .map_err(|e| AppError::bad_request(e.to_string()))?;

    Ok(Json(catalog.list(&query)))
}

/// `GET /books/{id}`: the full record. Ids that are not integers match no book.
pub async fn get_book(
    State(catalog): State<Arc<Catalog>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let book = raw_id
        .parse::<BookId>()
        .ok()
        .and_then(|id| catalog.get(id))
        .cloned();

    book.map(Json)
        .ok_or_else(|| AppError::not_found(BOOK_NOT_FOUND))
}
