//! Application State
//!
//! Everything the HTTP handlers share: the catalog, the session carts and
//! the model context the storefront tools are registered in.

use crate::cart::CartSessions;
use crate::catalog::CatalogStore;
use crate::webmcp::{register_storefront_tools, ModelContext, RegistryError, ToolRegistration};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub carts: Arc<CartSessions>,
    pub model_context: Arc<ModelContext>,
    registration: Mutex<Option<ToolRegistration>>,
}

impl AppState {
    /// Builds the state and registers the storefront tools.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        carts: Arc<CartSessions>,
    ) -> Result<Self, RegistryError> {
        let model_context = Arc::new(ModelContext::new());
        let registration =
            register_storefront_tools(&model_context, catalog.clone(), carts.clone())?;

        Ok(Self {
            catalog,
            carts,
            model_context,
            registration: Mutex::new(Some(registration)),
        })
    }

    /// Unregisters the storefront tools. Safe to call more than once.
    pub fn shutdown(&self) {
        let registration = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(registration) = registration {
            registration.unregister(&self.model_context);
            tracing::info!("Storefront tools unregistered");
        }
    }
}
