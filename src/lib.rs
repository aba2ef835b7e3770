//! # navvisor
//!
//! **Navvisor** is a lightweight navigation runtime for Rust.
//!
//! It mediates navigation between logical application states ("places") by
//! handing control of a single shared display slot to exactly one
//! "activity" — a stateful controller owning transient view state — at a
//! time. Its job is to make navigation safe in the presence of asynchronous
//! activity start-up: an activity may take arbitrarily long to produce its
//! view, further navigation may supersede it meanwhile, and nothing may
//! leak, double-display, or lose a failure on the way.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   application code                      navvisor
//!   ────────────────                      ────────
//!   dispatch(PlaceChangeRequested) ──► Bus ──► ActivityManager ── may_stop? ──► warning
//!   dispatch(PlaceChanged) ─────────► Bus ──► ActivityManager
//!                                               │
//!                                               ├─ cancel/stop previous activity
//!                                               │    └─ release its ScopedBus
//!                                               ├─ ActivityMapper::activity_for(place)
//!                                               └─ next.start(ViewHandle, ScopedBus)
//!                                                        │
//!                                  (sync or arbitrarily later, any thread)
//!                                                        │
//!                                               ViewHandle::show(view)
//!                                                        │ generation still current?
//!                                                        ▼
//!                                                  DisplaySink::show
//! ```
//!
//! ### Lifecycle
//! ```text
//! PlaceChanged(place) ──► manager
//!
//!   ├─► pending activity?  on_cancel(), release scope      (never presented)
//!   ├─► active activity?   on_stop(),   release scope      (view displaced)
//!   ├─► mapper.activity_for(place)
//!   │      ├─ None ──► slot empty; display left exactly as it was
//!   │      └─ Some ──► slot = Pending(activity, scope, fresh generation)
//!   │                  activity.start(view_handle, scope)
//!   │
//!   └─► hook failures collected across all steps, raised once as
//!       AggregateError (nested inside the bus's own dispatch aggregate)
//!
//! view_handle.show(view):
//!   stale generation or no display ──► silently dropped
//!   first current call ──► Pending promoted to Active, view shown
//!   later current calls ──► view swapped, no lifecycle churn
//! ```
//!
//! ## Features
//! | Area            | Description                                                       | Key types / traits                     |
//! |-----------------|-------------------------------------------------------------------|----------------------------------------|
//! | **Events**      | Typed synchronous bus with failure aggregation and scoped revoke. | [`Bus`], [`ScopedBus`], [`Subscription`] |
//! | **Places**      | Value-typed navigation targets and the two place events.          | [`Place`], [`PlaceChanged`], [`PlaceChangeRequested`] |
//! | **Activities**  | Lifecycle contract, shared handles, routing combinators.          | [`Activity`], [`ActivityRef`], [`ActivityMapper`] |
//! | **Core**        | The orchestrator, the display boundary, the gated callback.       | [`ActivityManager`], [`DisplaySink`], [`ViewHandle`] |
//! | **Errors**      | Ordered, inspectable failure aggregation.                         | [`AggregateError`], [`LifecycleError`], [`HookPhase`] |
//!
//! ## Optional features
//! - `async`: exports [`FutureActivity`], a tokio-backed adapter for
//!   activities whose view is produced by a spawned future.
//! - `logging`: exports a simple built-in [`NavLog`] printer _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use navvisor::{
//!     Activity, ActivityManager, ActivityRef, BoxError, Bus, PlaceChanged,
//!     PlaceChangeRequested, ScopedBus, ViewHandle,
//! };
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Route {
//!     Inbox,
//!     Compose,
//! }
//!
//! struct Inbox;
//!
//! impl Activity<String> for Inbox {
//!     fn start(&self, view: ViewHandle<String>, _events: ScopedBus) -> Result<(), BoxError> {
//!         // Synchronous reply; an RPC-backed activity would stash `view`
//!         // and call `show` once its data arrives.
//!         view.show("inbox: 3 unread".to_string());
//!         Ok(())
//!     }
//!
//!     fn may_stop(&self) -> Option<String> {
//!         None
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = Bus::new();
//!     let inbox: ActivityRef<String> = Arc::new(Inbox);
//!
//!     let manager = ActivityManager::new(
//!         move |route: &Route| match route {
//!             Route::Inbox => Some(inbox.clone()),
//!             Route::Compose => None,
//!         },
//!         bus.clone(),
//!     );
//!
//!     let shown: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
//!     let cell = Arc::clone(&shown);
//!     manager.set_display(Some(Arc::new(move |view: String| {
//!         *cell.lock().unwrap() = Some(view);
//!     })))?;
//!
//!     // Ask first, then commit.
//!     let request = PlaceChangeRequested::new(Route::Inbox);
//!     bus.dispatch(&request)?;
//!     assert_eq!(request.warning(), None);
//!
//!     bus.dispatch(&PlaceChanged::new(Route::Inbox))?;
//!     assert_eq!(shown.lock().unwrap().as_deref(), Some("inbox: 3 unread"));
//!     Ok(())
//! }
//! ```

mod activities;
mod core;
mod error;
mod events;
mod place;

// ---- Public re-exports ----

pub use activities::{Activity, ActivityMapper, ActivityRef, CachingMapper, FilteredMapper};
pub use core::{ActivityManager, DisplaySink, ViewHandle};
pub use error::{AggregateError, BoxError, HandlerPanic, HookPhase, LifecycleError};
pub use events::{Bus, BusEvent, ScopedBus, Subscription};
pub use place::{Place, PlaceChangeRequested, PlaceChanged};

// Optional: tokio-backed future activity adapter.
// Enable with: `--features async`
#[cfg(feature = "async")]
pub use activities::FutureActivity;

// Optional: expose a simple built-in place-event printer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::NavLog;
