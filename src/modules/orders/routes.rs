use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use folio_http::error::AppError;

use super::models::{Order, OrderCreated, SubmitOrder, UpdateOrder};
use super::OrdersState;
use crate::modules::clients::auth::Authenticated;

const INVALID_BOOK_ID: &str = "Invalid or missing bookId.";
const INVALID_CUSTOMER_NAME: &str = "Invalid or missing customerName.";
const BOOK_NOT_FOUND: &str = "Book not found.";
const OUT_OF_STOCK: &str = "This Book is not in stock. Try ordering later.";
const ORDER_NOT_FOUND: &str = "Order not found.";

/// `POST /orders`
pub async fn submit_order(
    State(state): State<OrdersState>,
    Authenticated(client): Authenticated,
    body: Bytes,
) -> Result<(StatusCode, Json<OrderCreated>), AppError> {
    // A body that is not a JSON object carries neither field.
    let body: SubmitOrder = serde_json::from_slice(&body).unwrap_or_default();

    let book_id = body
        .book_id()
        .ok_or_else(|| AppError::bad_request(INVALID_BOOK_ID))?;
    let customer_name = body
        .customer_name()
        .ok_or_else(|| AppError::bad_request(INVALID_CUSTOMER_NAME))?
        .to_string();

    let book = state
        .catalog
        .get(book_id)
        .ok_or_else(|| AppError::not_found(BOOK_NOT_FOUND))?;
    if !book.available {
        return Err(AppError::not_found(OUT_OF_STOCK));
    }

    let order = state.orders.create(book_id, customer_name).await?;
    tracing::info!(
        order_id = %order.id,
        book_id,
        client = %client.client_name,
        "order created"
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderCreated {
            created: true,
            order_id: order.id,
        }),
    ))
}

/// `GET /orders`
pub async fn list_orders(
    State(state): State<OrdersState>,
    _client: Authenticated,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.list().await?))
}

/// `GET /orders/{id}`
pub async fn get_order(
    State(state): State<OrdersState>,
    _client: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    state
        .orders
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(ORDER_NOT_FOUND))
}

/// `PATCH /orders/{id}`: an absent or empty `customerName` leaves the order as is
pub async fn update_order(
    State(state): State<OrdersState>,
    Authenticated(client): Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Order>, AppError> {
    let existing = state
        .orders
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found(ORDER_NOT_FOUND))?;

    let patch = if body.iter().all(u8::is_ascii_whitespace) {
        UpdateOrder::default()
    } else {
        serde_json::from_slice::<UpdateOrder>(&body)
            .map_err(|_| AppError::bad_request("Invalid request body."))?
    };

    let Some(customer_name) = patch.customer_name.filter(|name| !name.trim().is_empty()) else {
        return Ok(Json(existing));
    };

    let updated = state
        .orders
        .rename_customer(&id, customer_name)
        .await?
        .ok_or_else(|| AppError::not_found(ORDER_NOT_FOUND))?;
    tracing::info!(order_id = %updated.id, client = %client.client_name, "order updated");

    Ok(Json(updated))
}

/// `DELETE /orders/{id}`
pub async fn delete_order(
    State(state): State<OrdersState>,
    Authenticated(client): Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.orders.delete(&id).await? {
        return Err(AppError::not_found(ORDER_NOT_FOUND));
    }
    tracing::info!(order_id = %id, client = %client.client_name, "order deleted");

    Ok(StatusCode::NO_CONTENT)
}
