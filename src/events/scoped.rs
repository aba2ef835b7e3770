//! # Scoped subscriptions: per-activation bookkeeping with bulk release.
//!
//! [`ScopedBus`] forwards to a shared [`Bus`] and records every subscription
//! made through it. One scope is created per activity activation; when the
//! activation ends — normal stop, cancellation, or manager teardown — the
//! manager calls [`ScopedBus::release_all`] and every handler the activity
//! registered is removed from the underlying bus, no matter how its hooks
//! behaved.
//!
//! ```text
//! activity.start(view, scope)
//!      │
//!      ├─ scope.subscribe::<E1>(..) ──► bus registry    ┐ recorded
//!      ├─ scope.subscribe::<E2>(..) ──► bus registry    ┘
//!      │
//!  ... activation ends ...
//!      │
//!      └─ scope.release_all() ──► bus.unsubscribe(E1), bus.unsubscribe(E2)
//! ```
//!
//! ## Rules
//! - The recorded set is exactly the subscriptions added through the scope
//!   and not yet removed through it.
//! - `release_all` is idempotent, tolerates already-removed subscriptions,
//!   and never raises.
//! - Dispatching through a scope forwards unchanged; scopes only bookkeep
//!   registration, they do not filter delivery.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{AggregateError, BoxError};

use super::bus::{Bus, BusEvent, Subscription};

/// Forwarding wrapper around [`Bus`] with revoke-all bookkeeping.
///
/// Cheap to clone; clones share one recorded set, so an activity may retain
/// its scope past `start` and keep registering from later callbacks. Release
/// is explicit (the manager owns the activation lifecycle); dropping a scope
/// handle does not unregister anything.
#[derive(Clone)]
pub struct ScopedBus {
    bus: Bus,
    recorded: Arc<Mutex<Vec<Subscription>>>,
}

impl ScopedBus {
    /// Creates a scope over the given bus with an empty recorded set.
    pub fn new(bus: Bus) -> Self {
        ScopedBus {
            bus,
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers a handler on the underlying bus and records the
    /// subscription for bulk release.
    pub fn subscribe<E, F>(&self, handler: F) -> Subscription
    where
        E: BusEvent,
        F: Fn(&E) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let sub = self.bus.subscribe(handler);
        self.lock_recorded().push(sub);
        sub
    }

    /// Removes one subscription from the underlying bus and from the
    /// recorded set.
    ///
    /// Returns `true` if the underlying bus still had the handler.
    pub fn unsubscribe(&self, sub: Subscription) -> bool {
        self.lock_recorded().retain(|s| *s != sub);
        self.bus.unsubscribe(sub)
    }

    /// Forwards an event to the underlying bus unchanged.
    pub fn dispatch<E: BusEvent>(&self, event: &E) -> Result<(), AggregateError> {
        self.bus.dispatch(event)
    }

    /// Removes every recorded subscription from the underlying bus.
    ///
    /// Idempotent; removals that already happened elsewhere are no-ops.
    /// Never raises.
    pub fn release_all(&self) {
        let drained: Vec<Subscription> = {
            let mut recorded = self.lock_recorded();
            recorded.drain(..).collect()
        };
        for sub in drained {
            self.bus.unsubscribe(sub);
        }
    }

    /// Number of subscriptions currently recorded by this scope.
    pub fn recorded_count(&self) -> usize {
        self.lock_recorded().len()
    }

    fn lock_recorded(&self) -> std::sync::MutexGuard<'_, Vec<Subscription>> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
