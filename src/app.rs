//! Wiring of stores, modules and the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use folio_db::{JsonFileStore, MissingFile, SnapshotStore};
use folio_kernel::{
    settings::{Settings, StorageSettings},
    InitCtx, ModuleRegistry,
};

use crate::modules::{
    self,
    books::{catalog::Catalog, models::Book},
    clients::{models::ApiClient, registry::ClientRegistry},
    orders::{models::Order, repository::OrderRepository},
};

/// The stores every module is built from.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<Catalog>,
    pub clients: Arc<ClientRegistry>,
    pub orders: Arc<OrderRepository>,
}

impl Services {
    pub fn new(
        catalog: Catalog,
        client_store: Arc<dyn SnapshotStore<ApiClient>>,
        order_store: Arc<dyn SnapshotStore<Order>>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            clients: Arc::new(ClientRegistry::new(client_store)),
            orders: Arc::new(OrderRepository::new(order_store)),
        }
    }

    /// Open the JSON files named in `storage`.
    ///
    /// The catalog must exist; orders and clients start empty when absent.
    pub async fn from_storage(storage: &StorageSettings) -> anyhow::Result<Self> {
        let catalog_store: JsonFileStore<Book> =
            JsonFileStore::new(&storage.catalog_path, MissingFile::Error);
        let catalog = Catalog::load(&catalog_store).await?;

        tracing::info!(
            catalog = %storage.catalog_path.display(),
            orders = %storage.orders_path.display(),
            clients = %storage.clients_path.display(),
            books = catalog.len(),
            "storage opened"
        );

        let client_store: JsonFileStore<ApiClient> =
            JsonFileStore::new(&storage.clients_path, MissingFile::Empty);
        let order_store: JsonFileStore<Order> =
            JsonFileStore::new(&storage.orders_path, MissingFile::Empty);

        Ok(Self::new(
            catalog,
            Arc::new(client_store),
            Arc::new(order_store),
        ))
    }

    /// Read every collection once, failing on the first unreadable store.
    pub async fn report(&self) -> anyhow::Result<StorageReport> {
        Ok(StorageReport {
            books: self.catalog.len(),
            clients: self.clients.count().await.context("client registry")?,
            orders: self.orders.list().await.context("order store")?.len(),
        })
    }
}

/// Record counts of the three persisted collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageReport {
    pub books: usize,
    pub clients: usize,
    pub orders: usize,
}

/// Registry holding every module, built over `services`
pub fn build_registry(services: &Services) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, services);
    registry
}

/// Full HTTP router over `services`, middleware included
pub fn router(services: &Services, settings: &Settings) -> Router {
    folio_http::build_router(&build_registry(services), settings)
}

/// Open storage, bring modules up, serve until shutdown, then stop modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let services = Services::from_storage(&settings.storage)
        .await
        .context("failed to open storage")?;
    let registry = build_registry(&services);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = folio_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    served
}
