//! The seam between the connection manager and the underlying database driver
//!
//! The wire protocol is entirely the driver's business. The manager only
//! consumes the surface described by [`Driver`]: open a connection with
//! bounded timeouts, report global readiness, publish lifecycle events, and
//! (purely for diagnostics) list the schema/model names the driver knows
//! about.

use std::future::Future;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::ConnectOptions;

/// The driver's notion of whether its connection is currently usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
   /// A connection attempt is in flight
   Connecting,
   /// The connection is established and usable
   Connected,
   /// The connection has been lost or closed
   Disconnected,
   /// The connection is in a failed state
   Errored,
}

/// Asynchronous lifecycle notification emitted by the driver
///
/// These reflect changes in connection status independent of any in-flight
/// call. They are `Clone` so they can ride a [`broadcast`] channel to every
/// subscriber.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
   /// The driver established a connection
   Connected,
   /// The driver lost its connection
   Disconnected,
   /// The driver hit a connection-level error
   Error(DriverError),
}

/// Error reported by the underlying driver
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct DriverError {
   /// Human-readable failure description from the driver
   pub message: String,

   /// Provider-specific error code, when the driver reported one
   pub code: Option<String>,
}

impl DriverError {
   /// Create a driver error with no provider code
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         message: message.into(),
         code: None,
      }
   }

   /// Attach a provider-specific error code
   #[must_use]
   pub fn with_code(mut self, code: impl Into<String>) -> Self {
      self.code = Some(code.into());
      self
   }
}

/// Adapter trait for the underlying database driver
///
/// Implement this for whatever client your application uses. The manager
/// never inspects handles; it only caches and returns them, so `Handle` can
/// be the driver's client type, an `Arc` around it, or anything else cheap
/// to clone.
pub trait Driver: Send + Sync + 'static {
   /// Opaque reference to an established connection
   type Handle: Clone + Send + Sync + 'static;

   /// Open a connection using the given per-attempt options
   ///
   /// This is the manager's single suspension point: it must resolve when
   /// the driver reports success, or fail within the timeouts carried by
   /// `options`. The manager never retries internally.
   fn connect(
      &self,
      options: &ConnectOptions,
   ) -> impl Future<Output = Result<Self::Handle, DriverError>> + Send;

   /// Global readiness of the driver's connection registry
   fn ready_state(&self) -> ReadyState;

   /// Subscribe to lifecycle notifications
   ///
   /// The manager subscribes once at construction and keeps listening for
   /// its whole lifetime. Drivers should publish `Connected`,
   /// `Disconnected`, and `Error` events as their internal state changes.
   fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent>;

   /// Names of the schema/model definitions currently registered with the
   /// driver. Diagnostic only; never affects the manager's state machine.
   fn model_names(&self) -> Vec<String>;
}
