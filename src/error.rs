//! Error types for mongo-conn-mgr

use thiserror::Error;

use crate::driver::DriverError;

/// Errors that may occur when working with mongo-conn-mgr
#[derive(Error, Debug)]
pub enum Error {
   /// The connection URI environment variable is unset or empty.
   ///
   /// This is a configuration error, not a connection error: it is raised
   /// before any network I/O is attempted and retrying without fixing the
   /// environment cannot succeed.
   #[error("connection URI environment variable `{var}` is not set")]
   MissingUri {
      /// Name of the environment variable that was consulted
      var: String,
   },

   /// The driver failed to establish a connection.
   ///
   /// Carries the underlying driver error, including the provider-specific
   /// error code when the driver reported one. The cached connection slot
   /// has already been invalidated by the time this is returned.
   #[error("connection failed: {source}")]
   Connection {
      #[from]
      source: DriverError,
   },
}

impl Error {
   /// Provider-specific error code, if the failure carried one
   pub fn code(&self) -> Option<&str> {
      match self {
         Self::Connection { source } => source.code.as_deref(),
         Self::MissingUri { .. } => None,
      }
   }
}
