//! # Activity manager: orchestrates the single display slot.
//!
//! The [`ActivityManager`] listens for place events on the shared bus,
//! resolves the activity responsible for each new place, tears the previous
//! activity down deterministically, and gates asynchronous view delivery so
//! a superseded activity can never write the display.
//!
//! ## Transition, per place change
//! ```text
//! PlaceChanged(place) arrives (via the bus)
//!   1. pending activity?   on_cancel() ─► release its scope     ┐ failures
//!   2. active activity?    on_stop()   ─► release its scope     │ collected,
//!   3. resolve place through the mapper                         │ never
//!   4. none  ─► slot stays empty, display left untouched        │ short-
//!   5. some  ─► new scope + fresh generation, slot = Pending,   │ circuited
//!               activity.start(view_handle, scope)              ┘
//!   6. collected failures raised once, as one AggregateError
//! ```
//!
//! Step 5 records the activity as pending *before* `start` runs, so a
//! synchronous `view.show(..)` finds a current generation — and a raising
//! `start` still leaves its activity installed, since side effects it
//! performed before raising are not rolled back.
//!
//! ## Rules
//! - One logical thread delivers events; a transition runs to completion
//!   before the next notification is processed. Internal locks exist for
//!   `Send + Sync` soundness and are never held across hook or sink calls.
//! - The manager never writes the display on its own: not when a place
//!   resolves to no activity, not when stopping a predecessor. The last
//!   view stays up until a current activity replaces it.
//! - Cancellation is advisory to the activity (`on_cancel`) and
//!   authoritative at the manager: a superseded activation's
//!   [`ViewHandle`] is dead regardless of what the activity does with it.
//!
//! ## Example
//! ```
//! use std::sync::{Arc, Mutex};
//! use navvisor::{Activity, ActivityManager, ActivityRef, BoxError, Bus, PlaceChanged, ScopedBus, ViewHandle};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Route { Home }
//!
//! struct Home;
//! impl Activity<&'static str> for Home {
//!     fn start(&self, view: ViewHandle<&'static str>, _events: ScopedBus) -> Result<(), BoxError> {
//!         view.show("home");
//!         Ok(())
//!     }
//! }
//!
//! let bus = Bus::new();
//! let home: ActivityRef<&'static str> = Arc::new(Home);
//! let manager = ActivityManager::new(
//!     move |_route: &Route| Some(home.clone()),
//!     bus.clone(),
//! );
//!
//! let shown = Arc::new(Mutex::new(None));
//! let cell = Arc::clone(&shown);
//! manager
//!     .set_display(Some(Arc::new(move |view: &'static str| {
//!         *cell.lock().unwrap() = Some(view);
//!     })))
//!     .unwrap();
//!
//! bus.dispatch(&PlaceChanged::new(Route::Home)).unwrap();
//! assert_eq!(*shown.lock().unwrap(), Some("home"));
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::activities::ActivityMapper;
use crate::error::{AggregateError, BoxError, HookPhase, LifecycleError};
use crate::events::{Bus, ScopedBus, Subscription};
use crate::place::{Place, PlaceChangeRequested, PlaceChanged};

use super::display::DisplaySink;
use super::handle::ViewHandle;
use super::slot::{ManagerState, Slot};

/// The manager's own bus subscriptions, held while a display is attached.
struct PlaceHandlers {
    request: Subscription,
    change: Subscription,
}

/// Orchestrates activity lifecycles around one display slot.
///
/// Inert until a display sink is attached with
/// [`set_display`](ActivityManager::set_display); detaching tears the
/// current activity down and unsubscribes the manager from the bus, so a
/// manager should be detached before it is discarded.
pub struct ActivityManager<P, V> {
    mapper: Arc<dyn ActivityMapper<P, V>>,
    bus: Bus,
    state: Arc<Mutex<ManagerState<V>>>,
    place_handlers: Mutex<Option<PlaceHandlers>>,
}

impl<P, V> ActivityManager<P, V>
where
    P: Place,
    V: Send + 'static,
{
    /// Creates an idle manager over the given mapper and bus.
    pub fn new<M: ActivityMapper<P, V>>(mapper: M, bus: Bus) -> Self {
        ActivityManager {
            mapper: Arc::new(mapper),
            bus,
            state: Arc::new(Mutex::new(ManagerState::new())),
            place_handlers: Mutex::new(None),
        }
    }

    /// The bus this manager listens on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The scope of the pending-or-active activity, if any.
    ///
    /// Handlers registered through it are revoked when that activity is
    /// displaced, which makes it the right bus for collaborators acting on
    /// the current screen's behalf.
    pub fn active_scope(&self) -> Option<ScopedBus> {
        let guard = lock(&self.state);
        match &guard.slot {
            Slot::Pending { scope, .. } | Slot::Active { scope, .. } => Some(scope.clone()),
            Slot::Empty => None,
        }
    }

    /// Attaches or detaches the display sink.
    ///
    /// - `Some(sink)` while idle: the manager subscribes its two place-event
    ///   handlers and starts mediating navigation. Attaching while already
    ///   attached replaces the sink only; doing so mid-activity is a caller
    ///   error this design does not guard.
    /// - `None`: the current activity is stopped (`on_stop`) or, if still
    ///   pending, cancelled (`on_cancel`); its scope is released either way;
    ///   the place-event handlers are unsubscribed; the manager returns to
    ///   idle. Hook failures are collected and returned once as an
    ///   [`AggregateError`] after all cleanup has completed. Detaching while
    ///   idle is a no-op.
    pub fn set_display(&self, display: Option<Arc<dyn DisplaySink<V>>>) -> Result<(), AggregateError> {
        match display {
            Some(sink) => {
                let newly_attached = {
                    let mut guard = lock(&self.state);
                    let was_attached = guard.display.is_some();
                    guard.display = Some(sink);
                    !was_attached
                };
                if newly_attached {
                    self.subscribe_place_events();
                }
                Ok(())
            }
            None => self.detach(),
        }
    }

    fn detach(&self) -> Result<(), AggregateError> {
        let previous = {
            let mut guard = lock(&self.state);
            if guard.display.take().is_none() {
                return Ok(());
            }
            guard.slot.take()
        };

        let mut causes: Vec<BoxError> = Vec::new();
        match previous {
            Slot::Pending { activity, scope, .. } => {
                if let Err(e) = activity.on_cancel() {
                    causes.push(LifecycleError::boxed(HookPhase::Cancel, e));
                }
                scope.release_all();
            }
            Slot::Active { activity, scope, .. } => {
                if let Err(e) = activity.on_stop() {
                    causes.push(LifecycleError::boxed(HookPhase::Stop, e));
                }
                scope.release_all();
            }
            Slot::Empty => {}
        }

        let handlers = lock_handlers(&self.place_handlers).take();
        if let Some(handlers) = handlers {
            self.bus.unsubscribe(handlers.request);
            self.bus.unsubscribe(handlers.change);
        }

        if causes.is_empty() {
            Ok(())
        } else {
            Err(AggregateError::new(causes))
        }
    }

    fn subscribe_place_events(&self) {
        let state = Arc::clone(&self.state);
        let request = self.bus.subscribe(move |ev: &PlaceChangeRequested<P>| {
            // Only a promoted (view-bearing) activity is asked; a pending
            // one has produced nothing a user could lose.
            let active = {
                let guard = lock(&state);
                match &guard.slot {
                    Slot::Active { activity, .. } => Some(Arc::clone(activity)),
                    _ => None,
                }
            };
            if let Some(activity) = active {
                if let Some(warning) = activity.may_stop() {
                    ev.warn(warning);
                }
            }
            Ok(())
        });

        let state = Arc::clone(&self.state);
        let mapper = Arc::clone(&self.mapper);
        let bus = self.bus.clone();
        let change = self.bus.subscribe(move |ev: &PlaceChanged<P>| {
            process_place_change(&state, mapper.as_ref(), &bus, ev.place())
                .map_err(|aggregate| Box::new(aggregate) as BoxError)
        });

        *lock_handlers(&self.place_handlers) = Some(PlaceHandlers { request, change });
    }
}

/// Runs one full place-change transition. Hook failures are collected, not
/// short-circuited; the single aggregate raised afterwards propagates to the
/// dispatching bus, which nests it as one cause of its own aggregate.
fn process_place_change<P, V>(
    state: &Arc<Mutex<ManagerState<V>>>,
    mapper: &dyn ActivityMapper<P, V>,
    bus: &Bus,
    place: &P,
) -> Result<(), AggregateError>
where
    P: Place,
    V: Send + 'static,
{
    let mut causes: Vec<BoxError> = Vec::new();

    // Teardown first, in fixed order: cancel a pending occupant, stop an
    // active one. The slot is empty from here until the next install.
    let previous = lock(state).slot.take();
    match previous {
        Slot::Pending { activity, scope, .. } => {
            if let Err(e) = activity.on_cancel() {
                causes.push(LifecycleError::boxed(HookPhase::Cancel, e));
            }
            scope.release_all();
        }
        Slot::Active { activity, scope, .. } => {
            if let Err(e) = activity.on_stop() {
                causes.push(LifecycleError::boxed(HookPhase::Stop, e));
            }
            scope.release_all();
        }
        Slot::Empty => {}
    }

    // A handler earlier in this same dispatch may have detached the
    // manager; resolve and start only while a display is attached.
    let attached = lock(state).display.is_some();
    if attached {
        if let Some(next) = mapper.activity_for(place) {
            let scope = ScopedBus::new(bus.clone());
            let generation = {
                let mut guard = lock(state);
                guard.generations += 1;
                guard.slot = Slot::Pending {
                    activity: Arc::clone(&next),
                    scope: scope.clone(),
                    generation: guard.generations,
                };
                guard.generations
            };

            let handle = ViewHandle::new(Arc::downgrade(state), generation);
            if let Err(e) = next.start(handle, scope) {
                causes.push(LifecycleError::boxed(HookPhase::Start, e));
            }
        }
    }

    if causes.is_empty() {
        Ok(())
    } else {
        Err(AggregateError::new(causes))
    }
}

fn lock<V>(state: &Arc<Mutex<ManagerState<V>>>) -> MutexGuard<'_, ManagerState<V>> {
    // Hooks and sinks run outside this lock; poisoning would take a panic
    // inside the manager itself. Recover rather than cascade.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lock_handlers(handlers: &Mutex<Option<PlaceHandlers>>) -> MutexGuard<'_, Option<PlaceHandlers>> {
    handlers.lock().unwrap_or_else(PoisonError::into_inner)
}
