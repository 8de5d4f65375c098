//! # Customer Store
//!
//! Holds the checkout form record and mirrors it into [`LocalStorage`]
//! with debounced, coalesced writes.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Customer Store                                   │
//! │                                                                         │
//! │   keystroke ──► apply(action) ──► CustomerInfo (in memory, updated now) │
//! │                       │                                                 │
//! │                       │ PersistCommand::Save(json)                      │
//! │                       ▼                                                 │
//! │   ┌─────────────────────────────────────────────────────────────────┐  │
//! │   │                 Persist task (tokio)                            │  │
//! │   │                                                                 │  │
//! │   │   pending = latest json      deadline = last save + 500ms       │  │
//! │   │                                                                 │  │
//! │   │   Save ───► replace pending, push deadline back                 │  │
//! │   │   deadline ─► set_item("nox-customer-info", pending)            │  │
//! │   │   Flush ──► write pending now                                   │  │
//! │   │   Clear ──► drop pending, remove_item                           │  │
//! │   │   Shutdown / store dropped ──► drop pending, exit               │  │
//! │   └─────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │   Ten keystrokes inside one idle window → ONE storage write.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use nox_core::customer::{validate_customer_info, CustomerAction, CustomerInfo, CustomerValidation};
use nox_core::CUSTOMER_INFO_KEY;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::storage::LocalStorage;

/// Default idle window before the form is written to storage.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

// =============================================================================
// Commands
// =============================================================================

enum PersistCommand {
    /// Latest serialized record; restarts the idle window.
    Save(String),
    /// Write any pending record now.
    Flush(oneshot::Sender<StoreResult<()>>),
    /// Discard any pending record and delete the key.
    Clear(oneshot::Sender<StoreResult<()>>),
    /// Discard any pending record and stop.
    Shutdown,
}

// =============================================================================
// Customer Store
// =============================================================================

/// The checkout form, persisted with a debounce.
///
/// ## Usage
/// ```rust,ignore
/// let mut store = CustomerStore::open(storage, DEFAULT_DEBOUNCE).await;
/// store.apply(CustomerAction::UpdateText { field: CustomerField::City, value: "Chiba".into() });
/// // ...500ms of quiet later, the record is in storage
/// ```
pub struct CustomerStore {
    info: CustomerInfo,
    tx: mpsc::UnboundedSender<PersistCommand>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for CustomerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerStore")
            .field("info", &self.info)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl CustomerStore {
    /// Loads the saved record (or defaults) and starts the persist task.
    ///
    /// A missing key gives defaults. A value that fails to parse, or a
    /// storage read error, also gives defaults and logs a warning.
    pub async fn open<S: LocalStorage>(storage: S, debounce: Duration) -> Self {
        let info = match storage.get_item(CUSTOMER_INFO_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<CustomerInfo>(&json) {
                Ok(info) => {
                    debug!("Restored saved customer info");
                    info
                }
                Err(e) => {
                    warn!(error = %e, "Saved customer info is unreadable, using defaults");
                    CustomerInfo::default()
                }
            },
            Ok(None) => CustomerInfo::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read saved customer info, using defaults");
                CustomerInfo::default()
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_persist(storage, debounce, rx));

        info!(debounce_ms = debounce.as_millis() as u64, "Customer store opened");

        CustomerStore {
            info,
            tx,
            task: Some(task),
        }
    }

    /// The current record.
    pub fn info(&self) -> &CustomerInfo {
        &self.info
    }

    /// Applies an edit and schedules a debounced write.
    ///
    /// `CustomerAction::Clear` here only resets the record (and saves the
    /// defaults); [`clear`](Self::clear) also deletes the stored key.
    pub fn apply(&mut self, action: CustomerAction) {
        self.info.apply(action);
        self.schedule_save();
    }

    /// Replaces the whole record.
    pub fn set_customer_info(&mut self, info: CustomerInfo) {
        self.apply(CustomerAction::Set(info));
    }

    /// Resets to defaults, cancels any pending write and deletes the key.
    pub async fn clear(&mut self) -> StoreResult<()> {
        self.info = CustomerInfo::default();
        self.request(PersistCommand::Clear).await?;
        info!("Customer info cleared");
        Ok(())
    }

    /// Writes any pending record immediately.
    pub async fn flush(&self) -> StoreResult<()> {
        self.request(PersistCommand::Flush).await
    }

    /// Validates the current record.
    pub fn validate(&self) -> CustomerValidation {
        validate_customer_info(&self.info)
    }

    /// Stops the persist task. A write still waiting out its idle window
    /// is discarded; call [`flush`](Self::flush) first to keep it.
    pub async fn close(mut self) {
        let _ = self.tx.send(PersistCommand::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Customer persist task ended abnormally");
            }
        }
        debug!("Customer store closed");
    }

    fn schedule_save(&self) {
        match serde_json::to_string(&self.info) {
            Ok(json) => {
                if self.tx.send(PersistCommand::Save(json)).is_err() {
                    warn!("Customer persist task is gone, edit not saved");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize customer info"),
        }
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<StoreResult<()>>) -> PersistCommand,
    ) -> StoreResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(command(ack_tx))
            .map_err(|_| StoreError::Closed)?;
        ack_rx.await.map_err(|_| StoreError::Closed)?
    }
}

impl Drop for CustomerStore {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// =============================================================================
// Persist Task
// =============================================================================

async fn run_persist<S: LocalStorage>(
    storage: S,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<PersistCommand>,
) {
    let mut pending: Option<String> = None;
    let mut deadline = Instant::now();

    loop {
        tokio::select! {
            command = rx.recv() => {
                match command {
                    Some(PersistCommand::Save(json)) => {
                        pending = Some(json);
                        deadline = Instant::now() + debounce;
                    }
                    Some(PersistCommand::Flush(ack)) => {
                        let result = match pending.take() {
                            Some(json) => write(&storage, &json).await,
                            None => Ok(()),
                        };
                        let _ = ack.send(result);
                    }
                    Some(PersistCommand::Clear(ack)) => {
                        pending = None;
                        let _ = ack.send(storage.remove_item(CUSTOMER_INFO_KEY).await);
                    }
                    Some(PersistCommand::Shutdown) | None => {
                        if pending.is_some() {
                            debug!("Discarding unsaved customer info on shutdown");
                        }
                        break;
                    }
                }
            }
            _ = sleep_until(deadline), if pending.is_some() => {
                if let Some(json) = pending.take() {
                    if let Err(e) = write(&storage, &json).await {
                        warn!(error = %e, "Debounced customer info write failed");
                    }
                }
            }
        }
    }
}

async fn write<S: LocalStorage>(storage: &S, json: &str) -> StoreResult<()> {
    storage.set_item(CUSTOMER_INFO_KEY, json).await?;
    debug!(bytes = json.len(), "Customer info persisted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use nox_core::customer::{CustomerField, CustomerFlag};

    fn type_city(store: &mut CustomerStore, value: &str) {
        store.apply(CustomerAction::UpdateText {
            field: CustomerField::City,
            value: value.to_string(),
        });
    }

    fn saved(storage: &MemoryStorage) -> Option<CustomerInfo> {
        storage
            .peek(CUSTOMER_INFO_KEY)
            .map(|json| serde_json::from_str(&json).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_writes_once() {
        let storage = MemoryStorage::new();
        let mut store = CustomerStore::open(storage.clone(), DEFAULT_DEBOUNCE).await;

        for prefix in ["N", "Ni", "Nig", "Nigh", "Night"] {
            type_city(&mut store, prefix);
        }

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(storage.write_count(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(storage.write_count(), 1);
        assert_eq!(saved(&storage).unwrap().city, "Night");
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_edit_restarts_the_window() {
        let storage = MemoryStorage::new();
        let mut store = CustomerStore::open(storage.clone(), DEFAULT_DEBOUNCE).await;

        type_city(&mut store, "Chi");
        tokio::time::sleep(Duration::from_millis(300)).await;
        type_city(&mut store, "Chiba");
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(storage.write_count(), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(storage.write_count(), 1);
        assert_eq!(saved(&storage).unwrap().city, "Chiba");
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_write_separately() {
        let storage = MemoryStorage::new();
        let mut store = CustomerStore::open(storage.clone(), DEFAULT_DEBOUNCE).await;

        type_city(&mut store, "Chiba");
        tokio::time::sleep(Duration::from_millis(600)).await;
        store.apply(CustomerAction::UpdateFlag {
            flag: CustomerFlag::MarketingOptIn,
            value: true,
        });
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(storage.write_count(), 2);
        assert!(saved(&storage).unwrap().marketing_opt_in);
    }

    #[tokio::test]
    async fn test_open_restores_saved_record() {
        let storage = MemoryStorage::new();
        storage
            .set_item(CUSTOMER_INFO_KEY, r#"{"firstName":"Molly","city":"Sprawl"}"#)
            .await
            .unwrap();

        let store = CustomerStore::open(storage, DEFAULT_DEBOUNCE).await;
        assert_eq!(store.info().first_name, "Molly");
        assert_eq!(store.info().country, "United States");
    }

    #[tokio::test]
    async fn test_open_with_garbage_uses_defaults() {
        let storage = MemoryStorage::new();
        storage.set_item(CUSTOMER_INFO_KEY, "not json").await.unwrap();

        let store = CustomerStore::open(storage, DEFAULT_DEBOUNCE).await;
        assert_eq!(store.info(), &CustomerInfo::default());
    }

    #[tokio::test]
    async fn test_flush_writes_immediately() {
        let storage = MemoryStorage::new();
        let mut store = CustomerStore::open(storage.clone(), Duration::from_secs(3600)).await;

        type_city(&mut store, "Freeside");
        store.flush().await.unwrap();
        assert_eq!(saved(&storage).unwrap().city, "Freeside");

        // Nothing pending: flushing again is a no-op
        store.flush().await.unwrap();
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_deletes_key_and_cancels_pending() {
        let storage = MemoryStorage::new();
        let mut store = CustomerStore::open(storage.clone(), DEFAULT_DEBOUNCE).await;

        type_city(&mut store, "Chiba");
        store.flush().await.unwrap();
        type_city(&mut store, "Night City");

        store.clear().await.unwrap();
        assert_eq!(store.info(), &CustomerInfo::default());
        assert_eq!(storage.peek(CUSTOMER_INFO_KEY), None);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(storage.peek(CUSTOMER_INFO_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_discards_pending_write() {
        let storage = MemoryStorage::new();
        let mut store = CustomerStore::open(storage.clone(), DEFAULT_DEBOUNCE).await;

        type_city(&mut store, "Zion");
        store.close().await;

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_timer() {
        let storage = MemoryStorage::new();
        {
            let mut store = CustomerStore::open(storage.clone(), DEFAULT_DEBOUNCE).await;
            type_city(&mut store, "Zion");
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_reads_current_record() {
        let store = CustomerStore::open(MemoryStorage::new(), DEFAULT_DEBOUNCE).await;
        let result = store.validate();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 8);
    }
}
