//! Configuration for the connection manager

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the manager does when a connection attempt fails
///
/// Local and dev runs want to fail fast and loudly; hosted serverless runs
/// must never crash the host process, since that process may be serving
/// unrelated concurrent invocations. The policy is resolved once, at
/// construction time — the manager itself never reads the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
   /// Log the failure and terminate the process with a non-zero exit code
   Terminate,
   /// Return the error to the caller and keep the process running
   Surface,
}

impl FailurePolicy {
   /// Derive the policy from a deployment-environment variable
   ///
   /// `production` / `prod` (case-insensitive) map to [`Surface`]; any other
   /// value, including an unset variable, maps to [`Terminate`].
   ///
   /// [`Surface`]: FailurePolicy::Surface
   /// [`Terminate`]: FailurePolicy::Terminate
   pub fn from_env(var: &str) -> Self {
      match std::env::var(var) {
         Ok(value) if matches!(value.trim().to_ascii_lowercase().as_str(), "production" | "prod") => {
            Self::Surface
         }
         _ => Self::Terminate,
      }
   }
}

/// Configuration for [`ConnectionManager`]
///
/// # Examples
///
/// ```
/// use mongo_conn_mgr::{FailurePolicy, ManagerConfig};
///
/// // Use defaults
/// let config = ManagerConfig::default();
///
/// // Override just one field
/// let config = ManagerConfig {
///     server_selection_timeout_secs: 10,
///     ..Default::default()
/// };
///
/// // Resolve the fatal policy from the deployment environment
/// let config = ManagerConfig {
///     on_connect_failure: FailurePolicy::from_env("APP_ENV"),
///     ..Default::default()
/// };
/// ```
///
/// [`ConnectionManager`]: crate::ConnectionManager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
   /// How long the driver may spend selecting a reachable server (in seconds)
   ///
   /// Sized to absorb serverless cold-start latency.
   ///
   /// Default: 30
   pub server_selection_timeout_secs: u64,

   /// Socket-level timeout for the connect phase (in seconds)
   ///
   /// Kept longer than server selection so the socket never gives up first.
   ///
   /// Default: 45
   pub socket_timeout_secs: u64,

   /// Minimum pool size forwarded to the driver
   ///
   /// Default: 1
   pub min_pool_size: u32,

   /// Maximum pool size forwarded to the driver
   ///
   /// Default: 10
   pub max_pool_size: u32,

   /// What to do when a connection attempt fails
   ///
   /// Default: [`FailurePolicy::Surface`] — library callers opt into process
   /// termination explicitly, typically via [`FailurePolicy::from_env`].
   pub on_connect_failure: FailurePolicy,
}

impl Default for ManagerConfig {
   fn default() -> Self {
      Self {
         server_selection_timeout_secs: 30,
         socket_timeout_secs: 45,
         min_pool_size: 1,
         max_pool_size: 10,
         on_connect_failure: FailurePolicy::Surface,
      }
   }
}

/// Immutable per-attempt connection options handed to the driver
///
/// Built fresh from [`ManagerConfig`] and the resolved URI for every connect
/// attempt; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
   /// Connection URI, credentials included. Never log this raw — use
   /// [`redact_uri`] at every diagnostic emission point.
   ///
   /// [`redact_uri`]: crate::redact_uri
   pub uri: String,

   /// Bound on server selection
   pub server_selection_timeout: Duration,

   /// Bound on socket-level operations
   pub socket_timeout: Duration,

   /// Minimum pool size
   pub min_pool_size: u32,

   /// Maximum pool size
   pub max_pool_size: u32,
}

impl ConnectOptions {
   pub(crate) fn new(uri: String, config: &ManagerConfig) -> Self {
      Self {
         uri,
         server_selection_timeout: Duration::from_secs(config.server_selection_timeout_secs),
         socket_timeout: Duration::from_secs(config.socket_timeout_secs),
         min_pool_size: config.min_pool_size,
         max_pool_size: config.max_pool_size,
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn default_config_matches_documented_values() {
      let config = ManagerConfig::default();

      assert_eq!(config.server_selection_timeout_secs, 30);
      assert_eq!(config.socket_timeout_secs, 45);
      assert_eq!(config.min_pool_size, 1);
      assert_eq!(config.max_pool_size, 10);
      assert_eq!(config.on_connect_failure, FailurePolicy::Surface);
   }

   #[test]
   fn connect_options_carry_config_timeouts() {
      let config = ManagerConfig {
         server_selection_timeout_secs: 10,
         socket_timeout_secs: 20,
         ..Default::default()
      };

      let options = ConnectOptions::new("mongodb://host:27017/db".into(), &config);

      assert_eq!(options.uri, "mongodb://host:27017/db");
      assert_eq!(options.server_selection_timeout, Duration::from_secs(10));
      assert_eq!(options.socket_timeout, Duration::from_secs(20));
      assert_eq!(options.min_pool_size, 1);
      assert_eq!(options.max_pool_size, 10);
   }

   #[test]
   fn production_environments_surface_failures() {
      for value in ["production", "prod", "PRODUCTION", " Production "] {
         unsafe { std::env::set_var("TEST_FATAL_POLICY_PROD", value) };
         assert_eq!(
            FailurePolicy::from_env("TEST_FATAL_POLICY_PROD"),
            FailurePolicy::Surface,
            "value {value:?} should map to Surface"
         );
      }
      unsafe { std::env::remove_var("TEST_FATAL_POLICY_PROD") };
   }

   #[test]
   fn non_production_environments_terminate() {
      for value in ["development", "staging", "test", ""] {
         unsafe { std::env::set_var("TEST_FATAL_POLICY_DEV", value) };
         assert_eq!(
            FailurePolicy::from_env("TEST_FATAL_POLICY_DEV"),
            FailurePolicy::Terminate,
            "value {value:?} should map to Terminate"
         );
      }
      unsafe { std::env::remove_var("TEST_FATAL_POLICY_DEV") };
   }

   #[test]
   fn unset_environment_terminates() {
      unsafe { std::env::remove_var("TEST_FATAL_POLICY_UNSET") };
      assert_eq!(
         FailurePolicy::from_env("TEST_FATAL_POLICY_UNSET"),
         FailurePolicy::Terminate
      );
   }
}
