use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{error, info};

use super::model::*;
use super::repo::Repository;
use super::sqlite::SqliteRepository;

/// Readiness of the shared store handle.
pub enum StoreState {
    Uninitialized,
    Ready(Arc<dyn Repository>),
    Closed,
}

impl StoreState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreState::Uninitialized => "uninitialized",
            StoreState::Ready(_) => "ready",
            StoreState::Closed => "closed",
        }
    }
}

/// Store handle owned by the server and handed to every request.
///
/// The connection is opened after the listener is already accepting, so the
/// state is swapped in atomically and readers never wait on it.
#[derive(Clone)]
pub struct MovieStore {
    state: Arc<ArcSwap<StoreState>>,
}

impl Default for MovieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ArcSwap::from_pointee(StoreState::Uninitialized)),
        }
    }

    pub fn state(&self) -> &'static str {
        self.state.load().as_str()
    }

    /// Returns the open repository, or `ConnectionUnavailable` if the store
    /// has not finished opening or has been closed.
    pub fn repo(&self) -> DbResult<Arc<dyn Repository>> {
        match &**self.state.load() {
            StoreState::Ready(repo) => Ok(Arc::clone(repo)),
            _ => Err(DbError::ConnectionUnavailable),
        }
    }

    /// Marks the store ready. A store that was closed in the meantime stays
    /// closed and the new repository is dropped.
    pub async fn attach(&self, repo: Arc<dyn Repository>) {
        let mut closed = false;
        self.state.rcu(|current| match current.as_ref() {
            StoreState::Closed => {
                closed = true;
                Arc::clone(current)
            }
            _ => {
                closed = false;
                Arc::new(StoreState::Ready(Arc::clone(&repo)))
            }
        });
        if closed {
            repo.close().await;
        }
    }

    pub async fn connect(&self, db_path: &str) -> DbResult<()> {
        let repo = SqliteRepository::new(db_path).await?;
        self.attach(Arc::new(repo)).await;
        Ok(())
    }

    /// Opens the database in the background. Until that completes, every
    /// query fails with `ConnectionUnavailable`.
    pub fn connect_in_background(&self, db_path: String) {
        let store = self.clone();
        tokio::spawn(async move {
            match store.connect(&db_path).await {
                Ok(()) => info!("Connected to the SQLite database"),
                Err(e) => {
                    error!("Failed to open database {}: {}", db_path, e);
                    store.state.store(Arc::new(StoreState::Closed));
                }
            }
        });
    }

    pub async fn close(&self) {
        let prev = self.state.swap(Arc::new(StoreState::Closed));
        if let StoreState::Ready(repo) = prev.as_ref() {
            repo.close().await;
            info!("Database closed");
        }
    }
}
