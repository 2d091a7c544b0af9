pub mod models;
pub mod repository;
mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::FromRef, routing::get, Router};
use folio_kernel::{InitCtx, Module};

use crate::modules::books::catalog::Catalog;
use crate::modules::clients::registry::ClientRegistry;
use repository::OrderRepository;

/// Shared state of the order handlers
#[derive(Clone)]
pub struct OrdersState {
    pub orders: Arc<OrderRepository>,
    pub catalog: Arc<Catalog>,
    pub clients: Arc<ClientRegistry>,
}

impl FromRef<OrdersState> for Arc<ClientRegistry> {
    fn from_ref(state: &OrdersState) -> Self {
        state.clients.clone()
    }
}

/// Bearer-protected order lifecycle under `/orders`
pub struct OrdersModule {
    state: OrdersState,
}

impl OrdersModule {
    pub fn new(state: OrdersState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for OrdersModule {
    fn name(&self) -> &'static str {
        "orders"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let orders = self.state.orders.list().await?.len();
        tracing::info!(module = self.name(), orders, "orders module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/orders",
                get(routes::list_orders).post(routes::submit_order),
            )
            .route(
                "/orders/{id}",
                get(routes::get_order)
                    .patch(routes::update_order)
                    .delete(routes::delete_order),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let order = serde_json::json!({
            "description": "Order",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Order" }
                }
            }
        });
        let id_param = serde_json::json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);
        let security = serde_json::json!([{ "bearerAuth": [] }]);

        Some(serde_json::json!({
            "paths": {
                "/orders": {
                    "get": {
                        "summary": "List orders",
                        "tags": ["Orders"],
                        "security": security,
                        "responses": {
                            "200": {
                                "description": "All orders",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Order" }
                                        }
                                    }
                                }
                            },
                            "401": error("Missing or invalid bearer token")
                        }
                    },
                    "post": {
                        "summary": "Submit an order",
                        "tags": ["Orders"],
                        "security": security,
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/SubmitOrder" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Order created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/OrderCreated" }
                                    }
                                }
                            },
                            "400": error("Missing bookId or customerName"),
                            "401": error("Missing or invalid bearer token"),
                            "404": error("Book not found or not in stock")
                        }
                    }
                },
                "/orders/{id}": {
                    "get": {
                        "summary": "Get an order",
                        "tags": ["Orders"],
                        "security": security,
                        "parameters": id_param,
                        "responses": {
                            "200": order,
                            "401": error("Missing or invalid bearer token"),
                            "404": error("Order not found")
                        }
                    },
                    "patch": {
                        "summary": "Update the customer name of an order",
                        "tags": ["Orders"],
                        "security": security,
                        "parameters": id_param,
                        "requestBody": {
                            "required": false,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateOrder" }
                                }
                            }
                        },
                        "responses": {
                            "200": order,
                            "400": error("Body is not JSON"),
                            "401": error("Missing or invalid bearer token"),
                            "404": error("Order not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete an order",
                        "tags": ["Orders"],
                        "security": security,
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Order deleted" },
                            "401": error("Missing or invalid bearer token"),
                            "404": error("Order not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Order": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "bookId": { "type": "integer" },
                            "customerName": { "type": "string" }
                        },
                        "required": ["id", "bookId", "customerName"]
                    },
                    "SubmitOrder": {
                        "type": "object",
                        "properties": {
                            "bookId": { "type": "integer" },
                            "customerName": { "type": "string" }
                        },
                        "required": ["bookId", "customerName"]
                    },
                    "UpdateOrder": {
                        "type": "object",
                        "properties": {
                            "customerName": { "type": "string" }
                        }
                    },
                    "OrderCreated": {
                        "type": "object",
                        "properties": {
                            "created": { "type": "boolean" },
                            "orderId": { "type": "string" }
                        },
                        "required": ["created", "orderId"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the orders module
pub fn create_module(state: OrdersState) -> Arc<dyn Module> {
    Arc::new(OrdersModule::new(state))
}
