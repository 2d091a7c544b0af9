use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use folio_http::error::AppError;

use super::models::{AccessToken, RegisterClient};
use super::registry::ClientRegistry;

const FIELDS_REQUIRED: &str = "clientEmail and clientName required.";

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `POST /api-clients/`: issue a bearer token to a new client
pub async fn register_client(
    State(registry): State<Arc<ClientRegistry>>,
    body: Bytes,
) -> Result<(StatusCode, Json<AccessToken>), AppError> {
    let body: RegisterClient =
        serde_json::from_slice(&body).map_err(|_| AppError::bad_request(FIELDS_REQUIRED))?;

    let (Some(client_email), Some(client_name)) =
        (non_empty(body.client_email), non_empty(body.client_name))
    else {
        return Err(AppError::bad_request(FIELDS_REQUIRED));
    };

    let client = registry.register(&client_email, &client_name).await?;
    tracing::info!(client_name = %client.client_name, "API client registered");

    Ok((
        StatusCode::CREATED,
        Json(AccessToken {
            access_token: client.token,
        }),
    ))
}
