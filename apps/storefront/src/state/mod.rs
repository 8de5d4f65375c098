//! # State Module
//!
//! Focused state types, each injected only into the commands that need it.
//!
//! ```text
//! ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐
//! │    CartState     │ │  CustomerState   │ │  StorefrontConfig    │
//! │                  │ │                  │ │                      │
//! │  • Current cart  │ │  • Checkout form │ │  • Store name        │
//! │  • Arc<Mutex>    │ │  • Debounced     │ │  • Currency          │
//! │                  │ │    persistence   │ │  • DB path, debounce │
//! └──────────────────┘ └──────────────────┘ └──────────────────────┘
//! ┌──────────────────┐
//! │   FormThrottle   │
//! │                  │
//! │  • Auth form     │
//! │    submits per   │
//! │    user agent    │
//! └──────────────────┘
//! ```
//!
//! The auth facade is shared as `Arc<AuthFacade<P>>` directly.

pub mod cart;
pub mod config;
pub mod customer;
pub mod throttle;

pub use cart::CartState;
pub use config::StorefrontConfig;
pub use customer::CustomerState;
pub use throttle::FormThrottle;
