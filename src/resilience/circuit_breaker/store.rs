//! Storage capability for breaker state.
//!
//! The breaker's failure count, current state, and open timestamp are the
//! only shared mutable resource in the resilience core. All mutation goes
//! through [`BreakerStateStore::update`], which implementations must make
//! atomic with respect to concurrent callers: two in-flight failures must
//! never both decide to trip the circuit from stale reads.
//!
//! Only the in-process store ships. A multi-instance deployment would back
//! this trait with a shared store whose increments are server-side atomic.

use std::sync::Mutex;

use super::state::BreakerState;

/// Atomic storage for one breaker's mutable state.
pub trait BreakerStateStore: Send + Sync {
    /// Run `f` against the stored state under the store's serialization
    /// point, persisting any mutation before returning.
    fn update(&self, f: &mut dyn FnMut(&mut BreakerState));

    /// Consistent copy of the current state.
    fn snapshot(&self) -> BreakerState;
}

/// Process-local store: one mutex per breaker instance.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    state: Mutex<BreakerState>,
}

impl BreakerStateStore for InMemoryStateStore {
    fn update(&self, f: &mut dyn FnMut(&mut BreakerState)) {
        // State stays consistent even if a panic poisoned the lock; the
        // closure never leaves a half-applied transition behind.
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state);
    }

    fn snapshot(&self) -> BreakerState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
