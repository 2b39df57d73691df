//! Client-side services

pub mod catalog;
pub mod import;
pub mod reservations;
pub mod resolver;

use std::sync::Arc;

use crate::gateway::Gateway;

/// Container for all services
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub reservations: reservations::ReservationsService,
    pub resolver: Arc<resolver::AuthorResolver>,
    pub import: import::ImportService,
}

impl Services {
    /// Create all services over the given gateway
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let catalog = catalog::CatalogService::new(gateway.clone());
        let resolver = Arc::new(resolver::AuthorResolver::new(gateway.clone()));
        Self {
            reservations: reservations::ReservationsService::new(gateway.clone()),
            import: import::ImportService::new(gateway, resolver.clone(), catalog.clone()),
            catalog,
            resolver,
        }
    }
}
