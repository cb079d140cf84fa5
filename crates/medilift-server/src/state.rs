//! Shared server state.
//!
//! Planning calls each fetch their own catalog snapshot; nothing here is
//! mutated between requests.

use medilift_catalog::CatalogClient;

use crate::config::Config;

pub struct AppState {
    pub catalog: CatalogClient,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            catalog: CatalogClient::new(config.catalog_url.clone()),
        }
    }
}
