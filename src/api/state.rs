use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::services::enrichment::MetadataProvider;
use crate::store::Catalog;

/// Shared application state
///
/// Everything here is built once at startup and never mutated, so handlers
/// share it through plain `Arc`s with no locking.
#[derive(Clone)]
pub struct AppState {
    /// Loaded catalog artifacts; `None` when the startup load failed
    catalog: Arc<Option<Catalog>>,
    /// title -> TMDB id mapping, possibly empty
    pub id_map: Arc<HashMap<String, u64>>,
    /// Enrichment provider for poster/overview lookups
    pub provider: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(
        catalog: Option<Catalog>,
        id_map: HashMap<String, u64>,
        provider: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            id_map: Arc::new(id_map),
            provider,
        }
    }

    /// The loaded catalog, or the 503 every catalog-dependent endpoint
    /// reports until the artifacts load successfully.
    pub fn catalog(&self) -> AppResult<&Catalog> {
        self.catalog
            .as_ref()
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("Model not loaded".to_string()))
    }
}
