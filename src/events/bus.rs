//! # Event bus: typed, synchronous publish/subscribe.
//!
//! [`Bus`] routes events to handlers registered for the event's concrete
//! type. Dispatch is synchronous: every matching handler runs before
//! `dispatch` returns, on the dispatching thread.
//!
//! ## Architecture
//! ```text
//! subscribe::<E>(handler) ──► registry[TypeId(E)] += handler   (returns Subscription)
//!
//! dispatch(&event: &E) ──► snapshot registry[TypeId(E)]
//!                            │
//!                            ├─► handler 1 ──┐
//!                            ├─► handler 2 ──┼── failures collected in order
//!                            └─► handler N ──┘
//!                            ▼
//!                  Ok(()) or Err(AggregateError { causes })
//! ```
//!
//! ## Rules
//! - **Typed registration**: a handler registered for `E` only sees events of
//!   type `E`. Unrelated event types never collide.
//! - **Failure isolation**: a failing (or panicking) handler never prevents
//!   later handlers from running. All failures are collected in invocation
//!   order and reported once as a single [`AggregateError`].
//! - **Re-entrancy**: dispatch snapshots the handler list before invoking, so
//!   handlers may freely subscribe, unsubscribe, or dispatch on the same bus.
//!   A handler removed during a dispatch may still observe that dispatch.
//! - **Shared state**: handlers are `Fn`; use interior mutability
//!   (`Arc<Mutex<..>>`) for state they update.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{AggregateError, BoxError, HandlerPanic};

/// Marker for types that can travel on the [`Bus`].
///
/// Blanket-implemented: any `'static` type that is `Send + Sync` qualifies.
pub trait BusEvent: Any + Send + Sync {}

impl<T: Any + Send + Sync> BusEvent for T {}

/// Token returned by [`Bus::subscribe`], accepted by [`Bus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    type_id: TypeId,
    id: u64,
}

type ErasedHandler = Arc<dyn Fn(&dyn Any) -> Result<(), BoxError> + Send + Sync>;

struct HandlerEntry {
    id: u64,
    handler: ErasedHandler,
}

struct BusInner {
    handlers: Mutex<HashMap<TypeId, Vec<HandlerEntry>>>,
    next_id: AtomicU64,
}

/// Typed synchronous event channel.
///
/// Cheap to clone (internally holds an `Arc`-backed registry); clones share
/// one handler set. Multiple threads may subscribe and dispatch, though the
/// navigation runtime assumes a single logical thread of delivery.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Creates a new, empty bus.
    pub fn new() -> Self {
        Bus {
            inner: Arc::new(BusInner {
                handlers: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Registers a handler for events of type `E`.
    ///
    /// Handlers for one type run in subscription order. The returned
    /// [`Subscription`] removes exactly this handler when passed to
    /// [`Bus::unsubscribe`].
    ///
    /// # Example
    /// ```
    /// use navvisor::Bus;
    ///
    /// struct Saved { id: u32 }
    ///
    /// let bus = Bus::new();
    /// let sub = bus.subscribe(|ev: &Saved| {
    ///     assert_eq!(ev.id, 7);
    ///     Ok(())
    /// });
    /// bus.dispatch(&Saved { id: 7 }).unwrap();
    ///
    /// assert_eq!(bus.handler_count::<Saved>(), 1);
    /// assert!(bus.unsubscribe(sub));
    /// assert_eq!(bus.handler_count::<Saved>(), 0);
    /// ```
    pub fn subscribe<E, F>(&self, handler: F) -> Subscription
    where
        E: BusEvent,
        F: Fn(&E) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let erased: ErasedHandler = Arc::new(move |any: &dyn Any| match any.downcast_ref::<E>() {
            Some(event) => handler(event),
            None => Ok(()),
        });

        let type_id = TypeId::of::<E>();
        self.lock_handlers()
            .entry(type_id)
            .or_default()
            .push(HandlerEntry { id, handler: erased });

        Subscription { type_id, id }
    }

    /// Removes a previously registered handler.
    ///
    /// Returns `true` if the handler was still registered. Removing twice is
    /// a harmless no-op. A handler removed while a dispatch for its type is
    /// in flight may still observe that dispatch.
    pub fn unsubscribe(&self, sub: Subscription) -> bool {
        let mut handlers = self.lock_handlers();
        let Some(entries) = handlers.get_mut(&sub.type_id) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != sub.id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            handlers.remove(&sub.type_id);
        }
        removed
    }

    /// Delivers an event to every handler registered for its type.
    ///
    /// Every handler runs, in subscription order, even when earlier ones
    /// fail. Error returns and caught panics are collected in invocation
    /// order and raised as one [`AggregateError`]; a panicking handler
    /// surfaces as a [`HandlerPanic`] cause.
    pub fn dispatch<E: BusEvent>(&self, event: &E) -> Result<(), AggregateError> {
        let snapshot: Vec<ErasedHandler> = {
            let handlers = self.lock_handlers();
            handlers
                .get(&TypeId::of::<E>())
                .map(|entries| entries.iter().map(|e| Arc::clone(&e.handler)).collect())
                .unwrap_or_default()
        };

        let mut causes: Vec<BoxError> = Vec::new();
        for handler in snapshot {
            match catch_unwind(AssertUnwindSafe(|| (*handler)(event as &dyn Any))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => causes.push(e),
                Err(payload) => causes.push(Box::new(HandlerPanic::from_payload(payload))),
            }
        }

        if causes.is_empty() {
            Ok(())
        } else {
            Err(AggregateError::new(causes))
        }
    }

    /// Number of handlers currently registered for events of type `E`.
    pub fn handler_count<E: BusEvent>(&self) -> usize {
        self.lock_handlers()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    fn lock_handlers(&self) -> std::sync::MutexGuard<'_, HashMap<TypeId, Vec<HandlerEntry>>> {
        // Handlers run outside this lock, so poisoning can only come from a
        // panic in the bus itself; recover rather than cascade.
        self.inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerPanic;
    use std::sync::atomic::AtomicUsize;

    struct Ping(u32);
    struct Pong;

    #[test]
    fn test_typed_delivery_is_isolated() {
        let bus = Bus::new();
        let pings = Arc::new(AtomicUsize::new(0));
        let pongs = Arc::new(AtomicUsize::new(0));

        let p = Arc::clone(&pings);
        bus.subscribe(move |_: &Ping| {
            p.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let p = Arc::clone(&pongs);
        bus.subscribe(move |_: &Pong| {
            p.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.dispatch(&Ping(1)).unwrap();
        bus.dispatch(&Ping(2)).unwrap();
        assert_eq!(pings.load(Ordering::SeqCst), 2);
        assert_eq!(pongs.load(Ordering::SeqCst), 0, "Pong handler must not see Ping");
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let bus = Bus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(move |_: &Ping| {
                order.lock().unwrap().push(tag);
                Ok(())
            });
        }

        bus.dispatch(&Ping(0)).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_handler_does_not_block_later_handlers() {
        let bus = Bus::new();
        let reached = Arc::new(AtomicUsize::new(0));

        bus.subscribe(|_: &Ping| Err("early failure".into()));
        let r = Arc::clone(&reached);
        bus.subscribe(move |_: &Ping| {
            r.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let err = bus.dispatch(&Ping(0)).unwrap_err();
        assert_eq!(reached.load(Ordering::SeqCst), 1, "later handler must still run");
        assert_eq!(err.causes().len(), 1);
        assert_eq!(err.causes()[0].to_string(), "early failure");
    }

    #[test]
    fn test_panicking_handler_is_captured() {
        let bus = Bus::new();
        bus.subscribe(|_: &Ping| -> Result<(), BoxError> { panic!("handler blew up") });
        bus.subscribe(|_: &Ping| Err("plain failure".into()));

        let err = bus.dispatch(&Ping(0)).unwrap_err();
        assert_eq!(err.causes().len(), 2);
        let panic = err.causes()[0]
            .downcast_ref::<HandlerPanic>()
            .expect("first cause is the captured panic");
        assert_eq!(panic.info, "handler blew up");
        assert_eq!(err.causes()[1].to_string(), "plain failure");
    }

    #[test]
    fn test_unsubscribe_removes_exactly_one_handler() {
        let bus = Bus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = Arc::clone(&hits);
        let keep = bus.subscribe(move |_: &Ping| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let h = Arc::clone(&hits);
        let drop_me = bus.subscribe(move |_: &Ping| {
            h.fetch_add(10, Ordering::SeqCst);
            Ok(())
        });

        assert!(bus.unsubscribe(drop_me));
        assert!(!bus.unsubscribe(drop_me), "second removal is a no-op");
        bus.dispatch(&Ping(0)).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.handler_count::<Ping>(), 1);

        assert!(bus.unsubscribe(keep));
        assert_eq!(bus.handler_count::<Ping>(), 0);
    }

    #[test]
    fn test_dispatch_with_no_handlers_is_ok() {
        let bus = Bus::new();
        assert!(bus.dispatch(&Ping(0)).is_ok());
        assert_eq!(bus.handler_count::<Ping>(), 0);
    }

    #[test]
    fn test_handler_may_subscribe_during_dispatch() {
        let bus = Bus::new();
        let inner_bus = bus.clone();
        bus.subscribe(move |_: &Ping| {
            inner_bus.subscribe(|_: &Pong| Ok(()));
            Ok(())
        });

        bus.dispatch(&Ping(0)).unwrap();
        assert_eq!(bus.handler_count::<Pong>(), 1);
        bus.dispatch(&Pong).unwrap();
    }

    #[test]
    fn test_clones_share_one_registry() {
        let bus = Bus::new();
        let clone = bus.clone();
        clone.subscribe(|_: &Ping| Ok(()));
        assert_eq!(bus.handler_count::<Ping>(), 1);
    }
}
