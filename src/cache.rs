//! Cached-connection slot shared between the manager and its lifecycle listener

use parking_lot::Mutex;

/// Slot holding at most one connection handle for the manager's lifetime
///
/// Every transition funnels through [`fill`] and [`invalidate`], the single
/// guarded mutation point of the state machine. On a multi-threaded runtime
/// the lifecycle listener and in-flight `ensure_connected` calls run on
/// different worker threads, so the slot is mutex-protected; readers observe
/// either the old handle or none, never a half-updated state. The lock is
/// never held across an await point.
///
/// [`fill`]: ConnectionCache::fill
/// [`invalidate`]: ConnectionCache::invalidate
#[derive(Debug)]
pub(crate) struct ConnectionCache<H> {
   slot: Mutex<Option<H>>,
}

impl<H: Clone> ConnectionCache<H> {
   /// Create an empty slot
   pub(crate) fn new() -> Self {
      Self {
         slot: Mutex::new(None),
      }
   }

   /// Clone of the cached handle, if any
   pub(crate) fn get(&self) -> Option<H> {
      self.slot.lock().clone()
   }

   /// Store a freshly connected handle, replacing any previous one
   pub(crate) fn fill(&self, handle: H) {
      *self.slot.lock() = Some(handle);
   }

   /// Clear the slot
   ///
   /// Idempotent: clearing an already-empty slot is a no-op. Returns whether
   /// a handle was actually dropped.
   pub(crate) fn invalidate(&self) -> bool {
      self.slot.lock().take().is_some()
   }

   /// Whether the slot is currently empty
   pub(crate) fn is_empty(&self) -> bool {
      self.slot.lock().is_none()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn starts_empty() {
      let cache: ConnectionCache<u64> = ConnectionCache::new();

      assert!(cache.is_empty());
      assert_eq!(cache.get(), None);
   }

   #[test]
   fn fill_then_get_returns_the_handle() {
      let cache = ConnectionCache::new();
      cache.fill(7_u64);

      assert_eq!(cache.get(), Some(7));
      assert!(!cache.is_empty());
   }

   #[test]
   fn invalidate_is_idempotent() {
      let cache = ConnectionCache::new();
      cache.fill(7_u64);

      assert!(cache.invalidate(), "first invalidation drops the handle");
      assert!(!cache.invalidate(), "second invalidation is a no-op");
      assert!(cache.is_empty());
   }

   #[test]
   fn fill_replaces_previous_handle() {
      let cache = ConnectionCache::new();
      cache.fill(1_u64);
      cache.fill(2_u64);

      assert_eq!(cache.get(), Some(2));
   }
}
