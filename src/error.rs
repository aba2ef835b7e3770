//! Error types used by the navigation runtime.
//!
//! This module defines:
//!
//! - [`BoxError`] — the payload type lifecycle hooks and event handlers raise.
//! - [`LifecycleError`] — a hook failure tagged with the [`HookPhase`] that
//!   produced it.
//! - [`HandlerPanic`] — a panicking event handler, captured during dispatch.
//! - [`AggregateError`] — an ordered collection of failures raised once after
//!   a full transition or dispatch has run to completion.
//!
//! Failures are never used for control flow: teardown and start-up always run
//! to completion, collecting as they go, and the collected causes are raised
//! as a single [`AggregateError`] afterwards. Causes keep their original order
//! so diagnostics can recover exactly what failed and when.

use std::fmt;

use thiserror::Error;

/// Boxed error payload raised by activity hooks and event handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which lifecycle hook produced a collected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    /// `on_cancel` — the activity was superseded before presenting a view.
    Cancel,
    /// `on_stop` — the activity's view was displaced.
    Stop,
    /// `start` — the activity raised while readying its view.
    Start,
}

impl HookPhase {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use navvisor::HookPhase;
    ///
    /// assert_eq!(HookPhase::Cancel.as_label(), "cancel");
    /// assert_eq!(HookPhase::Start.as_label(), "start");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HookPhase::Cancel => "cancel",
            HookPhase::Stop => "stop",
            HookPhase::Start => "start",
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A lifecycle hook failure, tagged with the phase that produced it.
///
/// The manager wraps every hook error in one of these before collecting it,
/// so the causes of an [`AggregateError`] identify the failing hook without
/// relying on position alone.
#[derive(Debug, Error)]
#[error("{phase} hook failed: {source}")]
pub struct LifecycleError {
    /// The hook that raised.
    pub phase: HookPhase,
    /// The error the hook returned.
    #[source]
    pub source: BoxError,
}

impl LifecycleError {
    pub(crate) fn boxed(phase: HookPhase, source: BoxError) -> BoxError {
        Box::new(LifecycleError { phase, source })
    }
}

/// An event handler panicked during dispatch.
///
/// Dispatch isolates handler panics the same way it isolates error returns:
/// the panic is caught, converted to this error, and collected so the
/// remaining handlers still run.
#[derive(Debug, Error)]
#[error("event handler panicked: {info}")]
pub struct HandlerPanic {
    /// Best-effort rendering of the panic payload.
    pub info: String,
}

impl HandlerPanic {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let info = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        HandlerPanic { info }
    }
}

/// A single error whose payload is an ordered list of underlying causes.
///
/// Raised by [`Bus::dispatch`](crate::Bus::dispatch) when handlers fail, and
/// by the manager when lifecycle hooks fail during one transition. When a
/// failing manager transition surfaces through dispatch, the dispatch
/// aggregate holds the manager's aggregate as one of its causes; downcasting
/// recovers the nested structure.
///
/// # Example
/// ```
/// use navvisor::Bus;
///
/// struct Boom;
///
/// let bus = Bus::new();
/// bus.subscribe(|_: &Boom| Err("first".into()));
/// bus.subscribe(|_: &Boom| Err("second".into()));
///
/// let err = bus.dispatch(&Boom).unwrap_err();
/// assert_eq!(err.causes().len(), 2);
/// assert_eq!(err.causes()[0].to_string(), "first");
/// assert_eq!(err.causes()[1].to_string(), "second");
/// ```
#[derive(Debug)]
pub struct AggregateError {
    causes: Vec<BoxError>,
}

impl AggregateError {
    /// Builds an aggregate from collected causes, preserving their order.
    pub(crate) fn new(causes: Vec<BoxError>) -> Self {
        debug_assert!(!causes.is_empty(), "aggregate raised with no causes");
        AggregateError { causes }
    }

    /// The underlying causes, in the order they were produced.
    pub fn causes(&self) -> &[BoxError] {
        &self.causes
    }

    /// Consumes the aggregate, yielding its causes.
    pub fn into_causes(self) -> Vec<BoxError> {
        self.causes
    }

    /// Number of underlying causes (always at least one).
    pub fn len(&self) -> usize {
        self.causes.len()
    }

    /// True if there are no causes. Kept for API symmetry; a raised
    /// aggregate always carries at least one cause.
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.causes.first() {
            Some(first) => write!(f, "{} failure(s); first: {first}", self.causes.len()),
            None => f.write_str("0 failure(s)"),
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes
            .first()
            .map(|c| c.as_ref() as &(dyn std::error::Error + 'static))
    }
}
