pub mod books;
pub mod clients;
pub mod orders;

use std::sync::Arc;

use folio_kernel::ModuleRegistry;

use crate::app::Services;

/// Register every project module with the registry
pub fn register_all(registry: &mut ModuleRegistry, services: &Services) {
    registry.register(books::create_module(services.catalog.clone()));
    registry.register(clients::create_module(services.clients.clone()));
    registry.register(orders::create_module(orders::OrdersState {
        orders: Arc::clone(&services.orders),
        catalog: Arc::clone(&services.catalog),
        clients: Arc::clone(&services.clients),
    }));
}
