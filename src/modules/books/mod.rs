pub mod catalog;
pub mod models;
mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use folio_kernel::{InitCtx, Module};

use catalog::Catalog;

/// Read-only book catalog: `GET /books` and `GET /books/{id}`
pub struct BooksModule {
    catalog: Arc<Catalog>,
}

impl BooksModule {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = self.catalog.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/books", get(routes::list_books))
            .route("/books/{id}", get(routes::get_book))
            .with_state(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "type",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string", "enum": ["fiction", "non-fiction"] }
                            },
                            {
                                "name": "limit",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "integer", "minimum": 1, "maximum": 20 }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Book summaries",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/BookSummary" }
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Invalid type or limit",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Get a single book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Full book record",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book not found",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "type": { "type": "string", "enum": ["fiction", "non-fiction"] },
                            "available": { "type": "boolean" }
                        },
                        "required": ["id", "name", "type", "available"]
                    },
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "type": { "type": "string", "enum": ["fiction", "non-fiction"] },
                            "available": { "type": "boolean" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" },
                            "price": { "type": "number" },
                            "current-stock": { "type": "integer" }
                        },
                        "required": ["id", "name", "type", "available"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the books module
pub fn create_module(catalog: Arc<Catalog>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(catalog))
}
