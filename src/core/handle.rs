//! # View handle: the gated presentation callback.
//!
//! A [`ViewHandle`] is minted per activation and given to the activity's
//! `start`. It is the only path from an activity to the display sink, and it
//! is gated: a handle whose activation has been superseded becomes a silent
//! no-op, which is what makes arbitrarily late asynchronous replies safe.

use std::sync::{Mutex, PoisonError, Weak};

use super::slot::{ManagerState, Slot};

/// Presentation callback bound to one activity activation.
///
/// Cheap to clone and `Send`; an activity may stash it and call
/// [`show`](ViewHandle::show) from whatever context its work completes on,
/// any number of times. Calls are dropped without effect when:
///
/// - no display sink is attached (the manager was detached, or dropped,
///   after `start`), or
/// - the activation's generation is no longer current (a later place change
///   superseded it).
pub struct ViewHandle<V> {
    state: Weak<Mutex<ManagerState<V>>>,
    generation: u64,
}

impl<V> Clone for ViewHandle<V> {
    fn clone(&self) -> Self {
        ViewHandle {
            state: Weak::clone(&self.state),
            generation: self.generation,
        }
    }
}

impl<V> ViewHandle<V> {
    pub(crate) fn new(state: Weak<Mutex<ManagerState<V>>>, generation: u64) -> Self {
        ViewHandle { state, generation }
    }

    /// Pushes a view to the display sink, if this activation is still the
    /// current one.
    ///
    /// The first accepted call promotes the activation from pending to
    /// active; later accepted calls just replace the displayed view. Stale
    /// calls never touch the sink and never fail.
    pub fn show(&self, view: V) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(sink) = guard.display.clone() else {
            return;
        };

        let promoted = match &guard.slot {
            Slot::Pending {
                activity,
                scope,
                generation,
            } if *generation == self.generation => Some(Slot::Active {
                activity: std::sync::Arc::clone(activity),
                scope: scope.clone(),
                generation: *generation,
            }),
            Slot::Active { generation, .. } if *generation == self.generation => None,
            _ => return,
        };
        if let Some(active) = promoted {
            guard.slot = active;
        }

        // The sink is outside code; never call it under the state lock.
        drop(guard);
        sink.show(view);
    }
}
