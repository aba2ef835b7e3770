//! # Display sink: the single slot views land in.
//!
//! The manager owns exactly one optional sink and is the only writer to it;
//! activities reach it indirectly through their
//! [`ViewHandle`](crate::ViewHandle). The sink is a fire-and-forget
//! boundary: it accepts a view and is assumed not to raise.

/// Accepts the currently active activity's view.
///
/// Implemented for closures, so a sink can be as small as
/// `Arc::new(|view| root.replace_child(view))`.
pub trait DisplaySink<V>: Send + Sync {
    /// Shows the given view, replacing whatever was shown before.
    fn show(&self, view: V);
}

impl<V, F> DisplaySink<V> for F
where
    F: Fn(V) + Send + Sync,
{
    fn show(&self, view: V) {
        self(view)
    }
}
