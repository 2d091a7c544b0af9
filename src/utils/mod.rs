//! Identifier generation shared by the modules.

use uuid::Uuid;

/// Length of server-generated order ids.
pub const ORDER_ID_LEN: usize = 20;

/// Fresh bearer credential: a hyphenated UUID v4 (36 characters).
pub fn new_access_token() -> String {
    Uuid::new_v4().to_string()
}

/// Fresh order id: the first 20 hex digits of a UUID v4.
pub fn new_order_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ORDER_ID_LEN);
    id
}
