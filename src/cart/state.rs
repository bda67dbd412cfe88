//! Shopping Cart Session State
//!
//! Keeps one [`CartEngine`] per browser session. Each session persists into
//! its own storage scope so snapshots never collide on the fixed key.

use super::{
    engine::CartEngine,
    models::CartView,
    storage::{CartStorage, FileStorage, MemoryStorage},
};
use dashmap::{mapref::entry::Entry, DashMap};
use std::{path::PathBuf, sync::Arc};

/// Where session carts are persisted
#[derive(Debug, Clone)]
pub enum SessionStore {
    /// Snapshots live only as long as the process
    Memory,
    /// One directory per session under the given root
    Directory(PathBuf),
}

/// Cart engines keyed by session id
pub struct CartSessions {
    /// DashMap allows concurrent access without external Mutexes.
    carts: DashMap<String, CartEngine>,
    store: SessionStore,
}

impl Default for CartSessions {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl CartSessions {
    pub fn new(store: SessionStore) -> Self {
        Self {
            carts: DashMap::new(),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(SessionStore::Memory)
    }

    pub fn on_disk(root: impl Into<PathBuf>) -> Self {
        Self::new(SessionStore::Directory(root.into()))
    }

    fn storage_for(&self, session_id: &str) -> Arc<dyn CartStorage> {
        match &self.store {
            SessionStore::Memory => Arc::new(MemoryStorage::new()),
            SessionStore::Directory(root) => match FileStorage::scoped(root, session_id) {
                Ok(storage) => Arc::new(storage),
                Err(e) => {
                    tracing::warn!(
                        session = session_id,
                        error = %e,
                        "Falling back to memory storage"
                    );
                    Arc::new(MemoryStorage::new())
                }
            },
        }
    }

    /// Runs `f` against the session's cart, hydrating it on first use.
    ///
    /// A session is only kept once it holds something: hydrating an empty
    /// cart that `f` leaves empty does not add an entry.
    pub fn with_cart<R>(&self, session_id: &str, f: impl FnOnce(&mut CartEngine) -> R) -> R {
        match self.carts.entry(session_id.to_string()) {
            Entry::Occupied(mut entry) => f(entry.get_mut()),
            Entry::Vacant(entry) => {
                tracing::debug!(session = session_id, "Loading cart session");
                let mut cart = CartEngine::load(self.storage_for(session_id));
                let was_empty = cart.is_empty();
                let result = f(&mut cart);
                if !(was_empty && cart.is_empty()) {
                    entry.insert(cart);
                }
                result
            }
        }
    }

    /// Current view of the session's cart. A session with nothing stored
    /// is answered with an empty view and stays unloaded.
    pub fn view(&self, session_id: &str) -> CartView {
        if let Some(cart) = self.carts.get(session_id) {
            return cart.view();
        }
        self.with_cart(session_id, |cart| cart.view())
    }

    /// Number of sessions loaded in this process
    pub fn len(&self) -> usize {
        self.carts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }
}
