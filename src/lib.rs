//! # mongo-conn-mgr
//!
//! A connection-lifecycle manager for a remote document database client in
//! serverless environments. Opening a connection per invocation is expensive
//! and rate-limited, so this crate caches a single driver handle across warm
//! invocations and keeps that cache coherent with the driver's real
//! connection state.
//!
//! ## Core Types
//!
//! - **[`ConnectionManager`]**: caches at most one live handle and exposes
//!   the idempotent `ensure_connected` operation
//! - **[`ManagerConfig`]**: timeouts, pool bounds, and the fatal policy
//! - **[`CredentialSource`]**: resolves the connection URI from the
//!   environment, checked before any network I/O
//! - **[`Driver`]**: the seam adapting the underlying database driver
//! - **[`Error`]**: error type splitting configuration from connection
//!   failures
//!
//! ## Architecture
//!
//! - **Connection caching**: one slot per manager; a warm execution context
//!   reuses the handle, a cold start pays for one bounded connect
//! - **Event-driven invalidation**: a listener task consumes the driver's
//!   `connected`/`disconnected`/`error` notifications and clears the slot
//!   on failure, so the next `ensure_connected` reconnects
//! - **Bounded connect**: server-selection and socket timeouts are baked
//!   into every attempt; the manager never retries internally
//! - **Environment-dependent fatal policy**: non-production runs fail fast
//!   (process exit), production-like runs surface the error to the caller
//!
//! ## Usage
//!
//! ```no_run
//! use mongo_conn_mgr::{
//!    ConnectOptions, ConnectionManager, CredentialSource, Driver, DriverError,
//!    FailurePolicy, LifecycleEvent, ManagerConfig, ReadyState,
//! };
//! use tokio::sync::broadcast;
//!
//! // Adapt whatever database client you use to the `Driver` seam.
//! struct MyDriver {
//!    events: broadcast::Sender<LifecycleEvent>,
//! }
//!
//! impl Driver for MyDriver {
//!    type Handle = u64;
//!
//!    async fn connect(&self, _options: &ConnectOptions) -> Result<u64, DriverError> {
//!       // Dial _options.uri with the bounded timeouts it carries
//!       Ok(1)
//!    }
//!
//!    fn ready_state(&self) -> ReadyState {
//!       ReadyState::Connected
//!    }
//!
//!    fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
//!       self.events.subscribe()
//!    }
//!
//!    fn model_names(&self) -> Vec<String> {
//!       Vec::new()
//!    }
//! }
//!
//! #[tokio::main]
//! async fn main() -> mongo_conn_mgr::Result<()> {
//!    let (events, _) = broadcast::channel(16);
//!
//!    let manager = ConnectionManager::new(
//!       MyDriver { events },
//!       CredentialSource::default(), // reads MONGO_URI
//!       ManagerConfig {
//!          on_connect_failure: FailurePolicy::from_env("APP_ENV"),
//!          ..Default::default()
//!       },
//!    );
//!
//!    // Call before every database use; warm invocations are cache hits.
//!    let handle = manager.ensure_connected().await?;
//!    let again = manager.ensure_connected().await?;
//!    assert_eq!(handle, again);
//!    Ok(())
//! }
//! ```
//!
//! ## Design Principles
//!
//! - The wire protocol, pooling, and schema registry belong to the driver;
//!   this crate only manages the lifecycle around it
//! - All cache transitions funnel through one guarded mutation point, so
//!   readers never observe a half-updated slot
//! - Configuration is explicit: the fatal policy and timeouts live in
//!   [`ManagerConfig`], resolved at construction, never from ambient
//!   environment lookups inside the manager
//! - URIs are redacted at every diagnostic emission point
//!
mod cache;
mod config;
mod credentials;
mod driver;
mod error;
mod manager;

// Re-export public types
pub use config::{ConnectOptions, FailurePolicy, ManagerConfig};
pub use credentials::{CredentialSource, DEFAULT_URI_VAR, redact_uri};
pub use driver::{Driver, DriverError, LifecycleEvent, ReadyState};
pub use error::Error;
pub use manager::ConnectionManager;

/// A type alias for Results with our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
