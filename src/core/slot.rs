use std::sync::Arc;

use crate::activities::ActivityRef;
use crate::events::ScopedBus;

use super::display::DisplaySink;

/// Internal manager state: the display, the activity slot, and the
/// generation counter the freshness gate mints tokens from.
pub(crate) struct ManagerState<V> {
    /// Attached display sink, if any. `None` means the manager is inert.
    pub display: Option<Arc<dyn DisplaySink<V>>>,

    /// Current occupant of the single activity slot.
    pub slot: Slot<V>,

    /// Last generation token handed out. Incremented per activation.
    pub generations: u64,
}

impl<V> ManagerState<V> {
    pub fn new() -> Self {
        ManagerState {
            display: None,
            slot: Slot::Empty,
            generations: 0,
        }
    }
}

/// Occupancy of the activity slot.
pub(crate) enum Slot<V> {
    /// No activity is running or starting.
    Empty,

    /// An activity was started; its view has not arrived yet.
    Pending {
        activity: ActivityRef<V>,
        scope: ScopedBus,
        generation: u64,
    },

    /// An activity's view occupies the display sink.
    Active {
        activity: ActivityRef<V>,
        scope: ScopedBus,
        generation: u64,
    },
}

impl<V> Slot<V> {
    /// Empties the slot, returning the previous occupant.
    pub fn take(&mut self) -> Slot<V> {
        std::mem::replace(self, Slot::Empty)
    }
}
