//! # Customer State
//!
//! Shared handle to the debounced [`CustomerStore`]. Edits go through an
//! async mutex because `clear` and `flush` await the persist task.

use std::sync::Arc;

use tokio::sync::Mutex;

use nox_store::CustomerStore;

/// Thread-safe customer store wrapper.
#[derive(Debug, Clone)]
pub struct CustomerState {
    store: Arc<Mutex<CustomerStore>>,
}

impl CustomerState {
    pub fn new(store: CustomerStore) -> Self {
        CustomerState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Locks the store for the duration of one command.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, CustomerStore> {
        self.store.lock().await
    }

    /// Flushes pending edits and stops the persist task.
    ///
    /// Only the last handle can close the store; other clones just flush.
    pub async fn close(self) {
        {
            let store = self.store.lock().await;
            if let Err(e) = store.flush().await {
                tracing::warn!(error = %e, "Failed to flush customer info on shutdown");
            }
        }
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.into_inner().close().await,
            Err(_) => tracing::debug!("Customer store still shared, leaving it open"),
        }
    }
}
