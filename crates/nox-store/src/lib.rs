//! # nox-store: Durable Local Storage for the Nox Storefront
//!
//! Everything the storefront keeps on the client between sessions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Nox Storefront Data Flow                         │
//! │                                                                         │
//! │  Checkout form keystroke                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     nox-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ CustomerStore │    │ LocalStorage  │    │  Migrations  │  │   │
//! │  │   │ (customer.rs) │───►│  SqliteStorage│    │  (embedded)  │  │   │
//! │  │   │ debounced     │    │  MemoryStorage│    │ 001_local_   │  │   │
//! │  │   │ write-through │    │               │    │  storage.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/nox.db                                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`storage`] - The `LocalStorage` trait and the in-memory backend
//! - [`sqlite`] - SQLite backend and its configuration
//! - [`migrations`] - Embedded schema migrations
//! - [`customer`] - Debounced customer-info store
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nox_store::{CustomerStore, SqliteStorage, StorageConfig, DEFAULT_DEBOUNCE};
//!
//! let storage = SqliteStorage::open(StorageConfig::new("nox.db")).await?;
//! let mut customer = CustomerStore::open(storage, DEFAULT_DEBOUNCE).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod customer;
pub mod error;
pub mod migrations;
pub mod sqlite;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use customer::{CustomerStore, DEFAULT_DEBOUNCE};
pub use error::{StoreError, StoreResult};
pub use sqlite::{SqliteStorage, StorageConfig};
pub use storage::{LocalStorage, MemoryStorage};
