//! # Future-backed activity (`FutureActivity`)
//!
//! [`FutureActivity`] wraps a closure `F: Fn(ScopedBus, CancellationToken) ->
//! Fut`, producing a fresh future per activation. The future is spawned on
//! the ambient tokio runtime when the activity starts; if it resolves
//! `Some(view)` the view is presented through the activation's handle.
//!
//! ## Cancellation semantics
//! - `on_cancel` / `on_stop` cancel the activation's [`CancellationToken`];
//!   in-flight work should observe it and exit promptly.
//! - Even ignored cancellation is harmless: a view presented after the
//!   activation was superseded is dropped by the manager's generation gate.
//!
//! ## Example
//! ```no_run
//! use navvisor::{ActivityRef, FutureActivity, ScopedBus};
//! use tokio_util::sync::CancellationToken;
//!
//! let detail = FutureActivity::arc("item-detail", |_events: ScopedBus, ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return None;
//!     }
//!     // fetch the record, render...
//!     Some("item 42".to_string())
//! });
//! assert_eq!(detail.name(), "item-detail");
//! let detail: ActivityRef<String> = detail;
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use super::activity::Activity;
use crate::core::ViewHandle;
use crate::error::BoxError;
use crate::events::ScopedBus;

/// Function-backed activity whose view is produced by a spawned future.
///
/// Each `start` creates a **new** future owning its own state; shared state
/// across activations goes through an explicit `Arc` inside the closure.
/// Requires an ambient tokio runtime at `start` time.
pub struct FutureActivity<F> {
    name: Cow<'static, str>,
    f: F,
    running: Mutex<Option<CancellationToken>>,
}

impl<F> FutureActivity<F> {
    /// Creates a new future-backed activity.
    ///
    /// Prefer [`FutureActivity::arc`] when you immediately need an
    /// [`ActivityRef`](crate::ActivityRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        FutureActivity {
            name: name.into(),
            f,
            running: Mutex::new(None),
        }
    }

    /// Creates the activity and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }

    /// Stable, human-readable activity name (for logs).
    pub fn name(&self) -> &str {
        &self.name
    }

    fn cancel_running(&self) {
        let token = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(token) = token {
            token.cancel();
        }
    }
}

impl<F, Fut, V> Activity<V> for FutureActivity<F>
where
    F: Fn(ScopedBus, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<V>> + Send + 'static,
    V: Send + 'static,
{
    fn start(&self, view: ViewHandle<V>, events: ScopedBus) -> Result<(), BoxError> {
        let token = CancellationToken::new();
        {
            let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
            // A previous activation may still be in flight if the manager
            // restarted us; supersede its token.
            if let Some(old) = running.replace(token.clone()) {
                old.cancel();
            }
        }

        let fut = (self.f)(events, token.clone());
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                produced = fut => {
                    if let Some(v) = produced {
                        view.show(v);
                    }
                }
            }
        });
        Ok(())
    }

    fn on_cancel(&self) -> Result<(), BoxError> {
        self.cancel_running();
        Ok(())
    }

    fn on_stop(&self) -> Result<(), BoxError> {
        self.cancel_running();
        Ok(())
    }
}
