use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::game::MovieCatalog;

mod inventory;
mod sessions;

pub use self::inventory::{Inventory, StockEntry};
pub use self::sessions::{ConnectionId, Leaderboard, SessionStore};

/// Process-wide state shared by every connection.
///
/// Cloning is cheap: all parts live behind `Arc`, so each connection holds
/// its own handle to the same inventory, sessions and catalog.
#[derive(Clone, Default)]
pub struct Store {
    inventory: Arc<Inventory>,
    sessions: Arc<SessionStore>,
    leaderboard: Arc<Leaderboard>,
    catalog: Arc<MovieCatalog>,
    next_connection: Arc<AtomicU64>,
}

impl Store {
    /// Creates an empty store using the default movie catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that draws movies from `catalog`.
    pub fn with_catalog(catalog: MovieCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            ..Self::default()
        }
    }

    /// The shared product ledger.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Game sessions keyed by player name.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Player scores.
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Hands out a connection id unique within this store.
    pub fn next_connection_id(&self) -> ConnectionId {
        self.next_connection.fetch_add(1, Ordering::Relaxed)
    }

    /// Movies available to the game.
    pub fn catalog(&self) -> &MovieCatalog {
        &self.catalog
    }
}

/// Locks `mutex`, recovering the guard if another thread panicked while
/// holding it. Every critical section in the store leaves its map consistent
/// before anything can panic.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
