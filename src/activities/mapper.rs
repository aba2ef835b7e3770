//! # Place → activity resolution.
//!
//! [`ActivityMapper`] is the routing table boundary: given a place, hand
//! back the activity responsible for it, or `None` when the place has no
//! activity (the display then keeps whatever it was showing).
//!
//! Closures implement the trait directly, and two combinators cover the
//! common compositions: [`CachingMapper`] re-resolves only when the place
//! actually changes, [`FilteredMapper`] rewrites places before delegation.

use std::sync::{Mutex, PoisonError};

use super::activity::ActivityRef;
use crate::place::Place;

/// Resolves the activity responsible for a place.
///
/// Must behave as a pure function of the place: the manager calls it exactly
/// once per place change, and nothing is repaired if it diverges. Returning
/// `None` leaves the display slot untouched.
pub trait ActivityMapper<P, V>: Send + Sync + 'static {
    /// The activity for `place`, or `None` if the place has none.
    fn activity_for(&self, place: &P) -> Option<ActivityRef<V>>;
}

impl<P, V, F> ActivityMapper<P, V> for F
where
    F: Fn(&P) -> Option<ActivityRef<V>> + Send + Sync + 'static,
    P: 'static,
    V: 'static,
{
    fn activity_for(&self, place: &P) -> Option<ActivityRef<V>> {
        self(place)
    }
}

/// Caches the most recent resolution.
///
/// Useful when consecutive places are frequently equal (e.g. query-only
/// updates routed to the same screen) and the wrapped mapper allocates per
/// call. Absent resolutions are cached too.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use navvisor::{Activity, ActivityMapper, ActivityRef, BoxError, CachingMapper, ScopedBus, ViewHandle};
///
/// struct Screen;
/// impl Activity<&'static str> for Screen {
///     fn start(&self, view: ViewHandle<&'static str>, _events: ScopedBus) -> Result<(), BoxError> {
///         view.show("screen");
///         Ok(())
///     }
/// }
///
/// let resolutions = Arc::new(AtomicUsize::new(0));
/// let counted = Arc::clone(&resolutions);
/// let mapper = CachingMapper::new(move |_route: &u32| {
///     counted.fetch_add(1, Ordering::SeqCst);
///     Some(Arc::new(Screen) as ActivityRef<&'static str>)
/// });
///
/// mapper.activity_for(&1);
/// mapper.activity_for(&1);
/// mapper.activity_for(&2);
/// assert_eq!(resolutions.load(Ordering::SeqCst), 2);
/// ```
pub struct CachingMapper<P, V, M> {
    inner: M,
    cache: Mutex<Option<(P, Option<ActivityRef<V>>)>>,
}

impl<P, V, M> CachingMapper<P, V, M> {
    /// Wraps a mapper with a one-entry resolution cache.
    pub fn new(inner: M) -> Self {
        CachingMapper {
            inner,
            cache: Mutex::new(None),
        }
    }
}

impl<P, V, M> ActivityMapper<P, V> for CachingMapper<P, V, M>
where
    P: Place,
    V: Send + 'static,
    M: ActivityMapper<P, V>,
{
    fn activity_for(&self, place: &P) -> Option<ActivityRef<V>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached_place, cached)) = cache.as_ref() {
            if cached_place == place {
                return cached.clone();
            }
        }
        let resolved = self.inner.activity_for(place);
        *cache = Some((place.clone(), resolved.clone()));
        resolved
    }
}

/// Rewrites places before delegating to a wrapped mapper.
///
/// Lets one routing table serve transformed address spaces — collapsing
/// aliases, stripping decorations, redirecting legacy places.
pub struct FilteredMapper<M, F> {
    inner: M,
    filter: F,
}

impl<M, F> FilteredMapper<M, F> {
    /// Wraps a mapper with a place transform applied before delegation.
    pub fn new(filter: F, inner: M) -> Self {
        FilteredMapper { inner, filter }
    }
}

impl<P, V, M, F> ActivityMapper<P, V> for FilteredMapper<M, F>
where
    P: Place,
    V: 'static,
    M: ActivityMapper<P, V>,
    F: Fn(&P) -> P + Send + Sync + 'static,
{
    fn activity_for(&self, place: &P) -> Option<ActivityRef<V>> {
        let filtered = (self.filter)(place);
        self.inner.activity_for(&filtered)
    }
}
