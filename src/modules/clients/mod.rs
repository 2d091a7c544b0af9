pub mod auth;
pub mod models;
pub mod registry;
mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::post, Router};
use folio_kernel::{InitCtx, Module};

use registry::ClientRegistry;

/// API client registration: `POST /api-clients/`
pub struct ClientsModule {
    registry: Arc<ClientRegistry>,
}

impl ClientsModule {
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Module for ClientsModule {
    fn name(&self) -> &'static str {
        "clients"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        // Fails startup on an unreadable registry instead of on the first request.
        let clients = self.registry.count().await?;
        tracing::info!(module = self.name(), clients, "clients module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/api-clients/", post(routes::register_client))
            .route("/api-clients", post(routes::register_client))
            .with_state(self.registry.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/api-clients/": {
                    "post": {
                        "summary": "Register an API client",
                        "tags": ["Clients"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/RegisterClient" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Client registered",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/AccessToken" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing clientEmail or clientName",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "409": {
                                "description": "Email already registered",
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
                    "RegisterClient": {
                        "type": "object",
                        "properties": {
                            "clientEmail": { "type": "string", "format": "email" },
                            "clientName": { "type": "string" }
                        },
                        "required": ["clientEmail", "clientName"]
                    },
                    "AccessToken": {
                        "type": "object",
                        "properties": {
                            "accessToken": { "type": "string" }
                        },
                        "required": ["accessToken"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the clients module
pub fn create_module(registry: Arc<ClientRegistry>) -> Arc<dyn Module> {
    Arc::new(ClientsModule::new(registry))
}
