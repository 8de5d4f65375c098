//! # Nox Storefront Library
//!
//! Application layer of the Nox neon storefront: wires configuration,
//! local storage, the customer store and the auth facade together and
//! exposes the commands the pages call.
//!
//! ## Module Organization
//! ```text
//! nox_storefront/
//! ├── lib.rs           ◄─── You are here (bootstrap & tracing)
//! ├── state/
//! │   ├── mod.rs       ◄─── State type exports
//! │   ├── cart.rs      ◄─── Cart state management
//! │   ├── customer.rs  ◄─── Debounced checkout form
//! │   ├── throttle.rs  ◄─── Auth form attempt limits
//! │   └── config.rs    ◄─── Storefront configuration
//! ├── commands/
//! │   ├── mod.rs       ◄─── Command exports
//! │   ├── cart.rs      ◄─── Cart manipulation commands
//! │   ├── customer.rs  ◄─── Checkout form commands
//! │   ├── checkout.rs  ◄─── Order commands
//! │   └── account.rs   ◄─── Auth and profile commands
//! └── error.rs         ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Storefront<P>                                  │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │    CartState     │ │  CustomerState   │ │ Arc<AuthFacade<P>>   │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  • Line items    │ │  • Checkout form │ │  • Current user      │    │
//! │  │  • In memory     │ │  • SQLite, 500ms │ │  • Rate limits       │    │
//! │  │                  │ │    debounce      │ │  • Session events    │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  FormThrottle: sign-up / sign-in submits per user agent               │
//! │                                                                         │
//! │  Each command borrows only the state it needs.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use nox_auth::{AuthConfig, AuthFacade, IdentityProvider};
use nox_store::{CustomerStore, SqliteStorage, StorageConfig};

pub use error::{ApiError, ErrorCode, StartupError};
use state::{CartState, CustomerState, FormThrottle, StorefrontConfig};

/// A running storefront session.
pub struct Storefront<P: IdentityProvider> {
    pub config: StorefrontConfig,
    pub cart: CartState,
    pub customer: CustomerState,
    pub auth: Arc<AuthFacade<P>>,
    pub throttle: FormThrottle,
}

impl<P: IdentityProvider> Storefront<P> {
    /// Boots the storefront.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Storefront Startup                                │
    /// │                                                                         │
    /// │  1. Validate auth configuration ──────────────────────────────────────► │
    /// │                                                                         │
    /// │  2. Determine Database Path ──────────────────────────────────────────► │
    /// │     • NOX_DB_PATH, `:memory:`, or the platform data directory           │
    /// │                                                                         │
    /// │  3. Open Local Storage ───────────────────────────────────────────────► │
    /// │     • SQLite with WAL mode, pending migrations applied                  │
    /// │                                                                         │
    /// │  4. Restore Checkout Form ────────────────────────────────────────────► │
    /// │     • Saved record or defaults, debounce task started                   │
    /// │                                                                         │
    /// │  5. Start Auth Facade ────────────────────────────────────────────────► │
    /// │     • Subscribe to session events, load the current session             │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn bootstrap(
        config: StorefrontConfig,
        auth_config: AuthConfig,
        provider: Arc<P>,
    ) -> Result<Self, StartupError> {
        auth_config.validate()?;

        let storage_config = if config.is_in_memory() {
            StorageConfig::in_memory()
        } else {
            let path = config.resolve_database_path()?;
            info!(path = %path.display(), "Database path determined");
            StorageConfig::new(path)
        };
        let storage = SqliteStorage::open(storage_config).await?;

        let customer = CustomerState::new(CustomerStore::open(storage, config.debounce()).await);
        let auth = AuthFacade::start(provider, auth_config, config.client_id.clone()).await;

        info!(store = %config.store_name, "Storefront ready");

        Ok(Storefront {
            config,
            cart: CartState::new(),
            customer,
            auth: Arc::new(auth),
            throttle: FormThrottle::new(),
        })
    }

    /// Saves the checkout form and stops background tasks.
    pub async fn shutdown(self) {
        self.auth.shutdown();
        self.customer.close().await;
        info!("Storefront stopped");
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=nox_store=trace` - Show trace for one crate only
/// - Default: INFO, DEBUG for nox crates
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nox=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
