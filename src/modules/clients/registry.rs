use std::sync::Arc;

use async_trait::async_trait;
use folio_authz::Authenticator;
use folio_db::{SnapshotStore, StoreError};
use folio_http::error::AppError;
use thiserror::Error;
use tokio::sync::Mutex;

use super::models::ApiClient;
use crate::utils;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API client already registered.")]
    DuplicateEmail,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            err @ ClientError::DuplicateEmail => AppError::conflict(err.to_string()),
            ClientError::Store(e) => e.into(),
        }
    }
}

/// Registered API clients, keyed by token.
///
/// Every operation rereads the backing store so that clients registered by
/// another process sharing the same storage are visible immediately.
pub struct ClientRegistry {
    store: Arc<dyn SnapshotStore<ApiClient>>,
    write_lock: Mutex<()>,
}

impl ClientRegistry {
    pub fn new(store: Arc<dyn SnapshotStore<ApiClient>>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Register a client under a fresh token and persist the whole registry.
    pub async fn register(
        &self,
        client_email: &str,
        client_name: &str,
    ) -> Result<ApiClient, ClientError> {
        let _guard = self.write_lock.lock().await;

        let mut clients = self.store.load().await?;
        if clients.iter().any(|c| c.client_email == client_email) {
            return Err(ClientError::DuplicateEmail);
        }

        let token = loop {
            let candidate = utils::new_access_token();
            if !clients.iter().any(|c| c.token == candidate) {
                break candidate;
            }
        };

        let client = ApiClient {
            token,
            client_email: client_email.to_string(),
            client_name: client_name.to_string(),
        };
        clients.push(client.clone());
        self.store.save(&clients).await?;

        Ok(client)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<ApiClient>, StoreError> {
        let clients = self.store.load().await?;
        Ok(clients.into_iter().find(|c| c.token == token))
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.store.load().await?.len())
    }
}

#[async_trait]
impl Authenticator for ClientRegistry {
    type Principal = ApiClient;

    async fn resolve(&self, token: &str) -> anyhow::Result<Option<ApiClient>> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.find_by_token(token).await?)
    }
}
