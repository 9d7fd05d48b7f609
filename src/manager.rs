//! Connection manager: cache check, bounded connect, lifecycle listener

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::Result;
use crate::cache::ConnectionCache;
use crate::config::{ConnectOptions, FailurePolicy, ManagerConfig};
use crate::credentials::{CredentialSource, redact_uri};
use crate::driver::{Driver, LifecycleEvent, ReadyState};
use crate::error::Error;

/// Connection-lifecycle manager caching at most one live driver handle
///
/// Built for serverless execution: a warm context reuses the cached handle,
/// a cold start pays for one bounded connect. The cached slot moves through
/// a small state machine:
///
/// ```text
/// EMPTY  --(ensure_connected, connect succeeds)--> CACHED
/// CACHED --(ensure_connected, readiness == Connected)--> CACHED   [cache hit]
/// CACHED --(Disconnected/Error event)--> EMPTY
/// EMPTY  --(ensure_connected, connect fails)--> EMPTY   [error surfaced]
/// ```
///
/// `EMPTY` is both initial and re-enterable; there is no terminal state.
///
/// Handles returned from [`ensure_connected`] are provisionally valid only:
/// a `Disconnected` event may clear the slot right after the readiness check,
/// so operations against a handle must themselves be prepared to fail
/// mid-use. The next `ensure_connected` call is how callers observe such a
/// failure.
///
/// # Example
///
/// ```no_run
/// # use mongo_conn_mgr::{ConnectionManager, ConnectOptions, CredentialSource, Driver,
/// #    DriverError, LifecycleEvent, ManagerConfig, ReadyState};
/// # use tokio::sync::broadcast;
/// # struct MyDriver { events: broadcast::Sender<LifecycleEvent> }
/// # impl Driver for MyDriver {
/// #    type Handle = u64;
/// #    async fn connect(&self, _options: &ConnectOptions) -> Result<u64, DriverError> { Ok(1) }
/// #    fn ready_state(&self) -> ReadyState { ReadyState::Connected }
/// #    fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> { self.events.subscribe() }
/// #    fn model_names(&self) -> Vec<String> { Vec::new() }
/// # }
/// # async fn example(driver: MyDriver) -> mongo_conn_mgr::Result<()> {
/// let manager = ConnectionManager::new(
///     driver,
///     CredentialSource::default(),   // reads MONGO_URI
///     ManagerConfig::default(),
/// );
///
/// // Idempotent: call before every database use. A warm invocation
/// // returns the cached handle without any network I/O.
/// let handle = manager.ensure_connected().await?;
/// # Ok(())
/// # }
/// ```
///
/// [`ensure_connected`]: ConnectionManager::ensure_connected
pub struct ConnectionManager<D: Driver> {
   driver: D,
   credentials: CredentialSource,
   config: ManagerConfig,
   cache: ConnectionCache<D::Handle>,
}

impl<D: Driver> ConnectionManager<D> {
   /// Create a manager and install its lifecycle listener
   ///
   /// The listener is subscribed once, here, and runs for the manager's
   /// whole lifetime; it holds only a `Weak` reference, so dropping the
   /// last `Arc` ends the task.
   ///
   /// Must be called from within a Tokio runtime.
   pub fn new(driver: D, credentials: CredentialSource, config: ManagerConfig) -> Arc<Self> {
      let manager = Arc::new(Self {
         driver,
         credentials,
         config,
         cache: ConnectionCache::new(),
      });

      Self::spawn_lifecycle_listener(&manager);
      manager
   }

   /// Return a usable connection handle, connecting if necessary
   ///
   /// Cache hit (slot filled and driver readiness is `Connected`): returns
   /// the cached handle immediately with no network I/O. Cache miss: resolves
   /// the URI, opens a connection with the configured bounded timeouts, and
   /// caches the resulting handle. The connect await is this component's
   /// single suspension point.
   ///
   /// # Errors
   ///
   /// - [`Error::MissingUri`] when the URI variable is unset — checked
   ///   before any network attempt.
   /// - [`Error::Connection`] when the driver fails to connect and the
   ///   configured policy is [`FailurePolicy::Surface`]. Under
   ///   [`FailurePolicy::Terminate`] the same failure exits the process
   ///   instead of returning.
   ///
   /// Failures are never retried internally; re-invoking this method is the
   /// caller's (or an outer retry layer's) job.
   pub async fn ensure_connected(&self) -> Result<D::Handle> {
      if let Some(handle) = self.cache.get() {
         if self.driver.ready_state() == ReadyState::Connected {
            debug!("reusing cached connection");
            return Ok(handle);
         }

         // Readiness degraded without a lifecycle event reaching us yet;
         // treat the slot as stale and reconnect.
         self.cache.invalidate();
      }

      let uri = self.credentials.resolve_uri()?;
      let options = ConnectOptions::new(uri, &self.config);

      info!(
         uri = %redact_uri(&options.uri),
         server_selection_timeout_secs = options.server_selection_timeout.as_secs(),
         socket_timeout_secs = options.socket_timeout.as_secs(),
         "connecting"
      );

      match self.driver.connect(&options).await {
         Ok(handle) => {
            self.cache.fill(handle.clone());
            info!("connection established");
            Ok(handle)
         }
         Err(cause) => {
            self.cache.invalidate();
            error!(
               code = ?cause.code,
               error = %redact_uri(&cause.message),
               "connection attempt failed"
            );

            match self.config.on_connect_failure {
               FailurePolicy::Terminate => {
                  error!("connection failure is fatal in this environment, terminating");
                  std::process::exit(1);
               }
               FailurePolicy::Surface => Err(Error::from(cause)),
            }
         }
      }
   }

   /// Whether a handle is currently cached
   ///
   /// Diagnostic snapshot only: the lifecycle listener may clear the slot
   /// immediately after this returns.
   pub fn has_cached_connection(&self) -> bool {
      !self.cache.is_empty()
   }

   fn spawn_lifecycle_listener(manager: &Arc<Self>) {
      let mut events = manager.driver.subscribe();
      let weak = Arc::downgrade(manager);

      tokio::spawn(async move {
         loop {
            let event = match events.recv().await {
               Ok(event) => event,
               Err(RecvError::Lagged(skipped)) => {
                  warn!(skipped, "lifecycle listener lagged behind the driver");
                  continue;
               }
               Err(RecvError::Closed) => break,
            };

            let Some(manager) = weak.upgrade() else { break };
            manager.handle_lifecycle_event(event);
         }
      });
   }

   /// React to a driver lifecycle notification
   ///
   /// Disconnects and errors invalidate the slot synchronously, before this
   /// returns, so the next `ensure_connected` cannot observe stale state.
   /// Nothing here propagates to in-flight callers.
   fn handle_lifecycle_event(&self, event: LifecycleEvent) {
      match event {
         LifecycleEvent::Connected => {
            info!(
               models = ?self.driver.model_names(),
               "driver reported connection established"
            );
         }
         LifecycleEvent::Disconnected => {
            warn!("driver reported disconnect");
            self.cache.invalidate();
         }
         LifecycleEvent::Error(cause) => {
            // The driver's message may embed the URI it dialed
            error!(
               code = ?cause.code,
               error = %redact_uri(&cause.message),
               "driver reported connection error"
            );
            self.cache.invalidate();
         }
      }
   }
}
