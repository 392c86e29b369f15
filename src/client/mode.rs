//! Live/mock service mode
//!
//! The mode has three states. `AlwaysMock` is fixed at construction for
//! locked-down deployments. `Live` may move to `ForcedMock` exactly once and
//! never back, so once any request forces mock mode every later request on
//! the same instance skips the network.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    /// Requests go to the backend
    Live,
    /// Mock mode was forced by a bad key, a failed probe or rate limiting
    ForcedMock,
    /// Locked-down environment, the backend is never contacted
    AlwaysMock,
}

impl ServiceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMode::Live => "live",
            ServiceMode::ForcedMock => "forced_mock",
            ServiceMode::AlwaysMock => "always_mock",
        }
    }

    pub fn is_mock(&self) -> bool {
        !matches!(self, ServiceMode::Live)
    }
}

/// Shared, one-directional mode flag
#[derive(Debug)]
pub struct ModeSwitch {
    locked_down: bool,
    forced: AtomicBool,
}

impl ModeSwitch {
    /// Create the switch for an instance
    ///
    /// `locked_down` pins the mode to `AlwaysMock`. Otherwise an invalid key
    /// starts the instance already in `ForcedMock`.
    pub fn new(locked_down: bool, key_valid: bool) -> Self {
        Self {
            locked_down,
            forced: AtomicBool::new(!key_valid),
        }
    }

    pub fn live() -> Self {
        Self::new(false, true)
    }

    pub fn current(&self) -> ServiceMode {
        if self.locked_down {
            ServiceMode::AlwaysMock
        } else if self.forced.load(Ordering::Acquire) {
            ServiceMode::ForcedMock
        } else {
            ServiceMode::Live
        }
    }

    pub fn is_mock(&self) -> bool {
        self.current().is_mock()
    }

    pub fn is_locked_down(&self) -> bool {
        self.locked_down
    }

    /// Permanently switch to mock mode
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn force_mock(&self) -> bool {
        if self.locked_down {
            return false;
        }
        let transitioned = !self.forced.swap(true, Ordering::AcqRel);
        if transitioned {
            tracing::warn!("Mock mode forced; backend will not be contacted again");
        }
        transitioned
    }
}
