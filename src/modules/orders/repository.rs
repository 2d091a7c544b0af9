use std::sync::Arc;

use folio_db::{SnapshotStore, StoreError};
use tokio::sync::Mutex;

use super::models::Order;
use crate::modules::books::models::BookId;
use crate::utils;

/// Orders persisted as a full snapshot.
///
/// Each call reloads the snapshot; mutations hold `write_lock` across
/// load, change and save so they never interleave within this process.
pub struct OrderRepository {
    store: Arc<dyn SnapshotStore<Order>>,
    write_lock: Mutex<()>,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn SnapshotStore<Order>>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.store.load().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Order>, StoreError> {
        let orders = self.store.load().await?;
        Ok(orders.into_iter().find(|order| order.id == id))
    }

    /// Store a new order under a server-generated id.
    pub async fn create(
        &self,
        book_id: BookId,
        customer_name: String,
    ) -> Result<Order, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.store.load().await?;

        let id = loop {
            let candidate = utils::new_order_id();
            if !orders.iter().any(|order| order.id == candidate) {
                break candidate;
            }
        };

        let order = Order {
            id,
            book_id,
            customer_name,
        };
        orders.push(order.clone());
        self.store.save(&orders).await?;

        Ok(order)
    }

    /// Overwrite the customer name. `None` if the order does not exist.
    pub async fn rename_customer(
        &self,
        id: &str,
        customer_name: String,
    ) -> Result<Option<Order>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.store.load().await?;

        let Some(order) = orders.iter_mut().find(|order| order.id == id) else {
            return Ok(None);
        };
        order.customer_name = customer_name;
        let updated = order.clone();

        self.store.save(&orders).await?;
        Ok(Some(updated))
    }

    /// Remove an order. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.store.load().await?;

        let before = orders.len();
        orders.retain(|order| order.id != id);
        if orders.len() == before {
            return Ok(false);
        }

        self.store.save(&orders).await?;
        Ok(true)
    }
}
