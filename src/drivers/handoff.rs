use std::sync::{Condvar, Mutex};
use std::time::Duration;
/// Single-slot mailbox: a newer value overwrites one nobody has taken yet.
pub struct LatestSlot<T> {
    value: Mutex<Option<T>>,
    ready: Condvar,
}
impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            ready: Condvar::new(),
        }
    }
    /// Returns true when an unread value was replaced.
    pub fn publish(&self, value: T) -> bool {
        let mut slot = self.value.lock().unwrap_or_else(|e| e.into_inner());
        let replaced = slot.replace(value).is_some();
        self.ready.notify_one();
        replaced
    }
    pub fn try_take(&self) -> Option<T> {
        self.value.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
    /// Waits up to `timeout` for a value.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let slot = self.value.lock().unwrap_or_else(|e| e.into_inner());
        let (mut slot, _) = self
            .ready
            .wait_timeout_while(slot, timeout, |v| v.is_none())
            .unwrap_or_else(|e| e.into_inner());
        slot.take()
    }
}
