//! # NavLog — simple place-event printer
//!
//! A minimal observer that prints place traffic to stdout. Use it for tests
//! or demos.
//!
//! ## Example output
//! ```text
//! [place-change-requested] place=Item { id: 42 }
//! [place-changed] place=Item { id: 42 }
//! ```

use crate::events::{Bus, Subscription};
use crate::place::{Place, PlaceChangeRequested, PlaceChanged};

/// Place-event printer.
///
/// Attach once per place type; keep the returned subscriptions if you intend
/// to detach it later.
pub struct NavLog;

impl NavLog {
    /// Subscribes a printer for both place events of type `P`.
    pub fn attach<P: Place>(bus: &Bus) -> (Subscription, Subscription) {
        let requested = bus.subscribe(|ev: &PlaceChangeRequested<P>| {
            println!("[place-change-requested] place={:?}", ev.place());
            Ok(())
        });
        let changed = bus.subscribe(|ev: &PlaceChanged<P>| {
            println!("[place-changed] place={:?}", ev.place());
            Ok(())
        });
        (requested, changed)
    }
}
