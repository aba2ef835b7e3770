//! # Activity contract.
//!
//! An activity is a long-lived stateful controller bound to a place. The
//! manager drives it through four hooks and otherwise never inspects it.
//!
//! ## Lifecycle
//! ```text
//! place change resolves to the activity
//!        │
//!        ▼
//!  start(view, events) ──── view.show(..) ──► activity is Active
//!        │                     (0..n times,      │
//!        │ superseded before    sync or later)   │ superseded
//!        ▼ any show                              ▼
//!    on_cancel()                             on_stop()
//! ```
//!
//! `may_stop` may be consulted at any point while the activity is Active, in
//! response to a place-change *request*.

use std::sync::Arc;

use crate::core::ViewHandle;
use crate::error::BoxError;
use crate::events::ScopedBus;

/// Shared handle to an activity (`Arc<dyn Activity<V>>`).
pub type ActivityRef<V> = Arc<dyn Activity<V>>;

/// Stateful controller of one navigation target.
///
/// Hooks take `&self`; implementations that carry mutable state use interior
/// mutability, since the manager (and any pending asynchronous work) may
/// hold the activity behind a shared [`ActivityRef`].
///
/// `on_cancel` and `on_stop` default to no-ops and `may_stop` to "no
/// objection", so a minimal activity implements only `start`.
///
/// # Example
/// ```
/// use navvisor::{Activity, BoxError, ScopedBus, ViewHandle};
///
/// struct Greeting;
///
/// impl Activity<String> for Greeting {
///     fn start(&self, view: ViewHandle<String>, _events: ScopedBus) -> Result<(), BoxError> {
///         view.show("hello".to_string());
///         Ok(())
///     }
/// }
/// ```
pub trait Activity<V>: Send + Sync + 'static {
    /// Asked when navigation away is *requested*, while this activity is
    /// active. A returned message warns the user (e.g. of unsaved work);
    /// `None` raises no objection. Advisory only — the manager never blocks
    /// navigation on it.
    fn may_stop(&self) -> Option<String> {
        None
    }

    /// Called when the activity was superseded before it presented any view.
    /// `on_stop` will not be called for this activation.
    fn on_cancel(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Called when the activity's view has been displaced. Handlers the
    /// activity registered through its scope are removed right after this
    /// hook returns; the activity must not rely on them afterwards.
    fn on_stop(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Readies the activity's view.
    ///
    /// Present the view by calling [`ViewHandle::show`] — synchronously, or
    /// later from any thread once asynchronous work (an RPC, a timer)
    /// completes. Zero calls are legitimate (e.g. the activity redirects
    /// instead); so are repeated calls, which swap the displayed view while
    /// the activity stays current.
    ///
    /// Handlers registered on `events` are revoked automatically when this
    /// activation is cancelled or stopped, so the returned
    /// [`Subscription`](crate::Subscription)s rarely need keeping.
    fn start(&self, view: ViewHandle<V>, events: ScopedBus) -> Result<(), BoxError>;
}
