//! Event plumbing: the shared bus and per-activation scopes.
//!
//! ## Contents
//! - [`Bus`] — typed synchronous publish/subscribe with failure aggregation
//! - [`ScopedBus`] — forwarding wrapper recording subscriptions for bulk release
//! - [`Subscription`] — removal token, [`BusEvent`] — marker for event types
//!
//! ## Quick reference
//! - **Publishers**: the application (place changes and its own domain
//!   events), activities (through their scope).
//! - **Consumers**: the manager's two place-event handlers, activity
//!   handlers registered through a scope, application observers.

mod bus;
mod scoped;

pub use bus::{Bus, BusEvent, Subscription};
pub use scoped::ScopedBus;
