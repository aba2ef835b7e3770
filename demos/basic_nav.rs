//! Minimal synchronous navigation: two screens, one veto.
//!
//! Run with: `cargo run --example basic_nav`

use std::sync::{Arc, Mutex};

use navvisor::{
    Activity, ActivityManager, ActivityRef, BoxError, Bus, PlaceChangeRequested, PlaceChanged,
    ScopedBus, ViewHandle,
};

#[derive(Clone, PartialEq, Debug)]
enum Route {
    Inbox,
    Compose,
}

struct Inbox;

impl Activity<String> for Inbox {
    fn start(&self, view: ViewHandle<String>, _events: ScopedBus) -> Result<(), BoxError> {
        view.show("inbox: 3 unread".to_string());
        Ok(())
    }
}

struct Compose {
    dirty: bool,
}

impl Activity<String> for Compose {
    fn may_stop(&self) -> Option<String> {
        self.dirty.then(|| "Discard the unsent draft?".to_string())
    }

    fn start(&self, view: ViewHandle<String>, _events: ScopedBus) -> Result<(), BoxError> {
        view.show("compose: new message".to_string());
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::new();

    let inbox: ActivityRef<String> = Arc::new(Inbox);
    let compose: ActivityRef<String> = Arc::new(Compose { dirty: true });
    let manager = ActivityManager::new(
        move |route: &Route| match route {
            Route::Inbox => Some(inbox.clone()),
            Route::Compose => Some(compose.clone()),
        },
        bus.clone(),
    );

    let shown: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let cell = Arc::clone(&shown);
    manager.set_display(Some(Arc::new(move |view: String| {
        println!("[display] {view}");
        *cell.lock().unwrap() = Some(view);
    })))?;

    bus.dispatch(&PlaceChanged::new(Route::Compose))?;

    // Ask before leaving; the draft objects.
    let request = PlaceChangeRequested::new(Route::Inbox);
    bus.dispatch(&request)?;
    if let Some(warning) = request.warning() {
        println!("[veto] {warning} — navigating anyway");
    }

    bus.dispatch(&PlaceChanged::new(Route::Inbox))?;
    assert_eq!(shown.lock().unwrap().as_deref(), Some("inbox: 3 unread"));

    manager.set_display(None)?;
    Ok(())
}
