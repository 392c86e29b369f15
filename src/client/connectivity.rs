//! Process-wide online/offline signal
//!
//! Checked synchronously before any network call. The hosting application
//! flips it from whatever network monitoring it has; nothing in this crate
//! marks the process offline on its own.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct NetworkStatus {
    online: AtomicBool,
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::online()
    }
}

impl NetworkStatus {
    pub fn online() -> Self {
        Self {
            online: AtomicBool::new(true),
        }
    }

    pub fn offline() -> Self {
        Self {
            online: AtomicBool::new(false),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::AcqRel);
        if previous != online {
            tracing::info!(online, "Network connectivity changed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let status = NetworkStatus::default();
        assert!(status.is_online());
        status.set_online(false);
        assert!(!status.is_online());
        status.set_online(true);
        assert!(status.is_online());
        assert!(!NetworkStatus::offline().is_online());
    }
}
