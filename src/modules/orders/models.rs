use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::modules::books::models::BookId;

/// A customer's request for one catalog book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub book_id: BookId,
    pub customer_name: String,
}

/// Body of `POST /orders`. Fields stay untyped so each one is validated on its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrder {
    #[serde(default)]
    pub book_id: Option<Value>,
    #[serde(default)]
    pub customer_name: Option<Value>,
}

impl SubmitOrder {
    /// A non-zero integer id.
    pub fn book_id(&self) -> Option<BookId> {
        self.book_id
            .as_ref()
            .and_then(Value::as_i64)
            .filter(|id| *id != 0)
    }

    /// A string with at least one non-whitespace character.
    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name
            .as_ref()
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
    }
}

/// Body of `PATCH /orders/{id}`. Only the customer name is editable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    #[serde(default)]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub created: bool,
    pub order_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submit(body: Value) -> SubmitOrder {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn submit_fields_are_checked_independently() {
        let body = submit(json!({"bookId": 1, "customerName": 42}));
        assert_eq!(body.book_id(), Some(1));
        assert_eq!(body.customer_name(), None);

        let body = submit(json!({"bookId": "1", "customerName": "Ann"}));
        assert_eq!(body.book_id(), None);
        assert_eq!(body.customer_name(), Some("Ann"));
    }

    #[test]
    fn zero_book_id_and_blank_name_count_as_missing() {
        let body = submit(json!({"bookId": 0, "customerName": "  "}));
        assert_eq!(body.book_id(), None);
        assert_eq!(body.customer_name(), None);
        assert_eq!(SubmitOrder::default().book_id(), None);
    }
}
