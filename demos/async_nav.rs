//! Asynchronous start-up and supersession: a slow screen loses the race.
//!
//! Run with: `cargo run --example async_nav --features async`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use navvisor::{ActivityManager, ActivityRef, Bus, FutureActivity, PlaceChanged, ScopedBus};
use tokio_util::sync::CancellationToken;

#[derive(Clone, PartialEq, Debug)]
enum Route {
    Dashboard,
    Report,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::new();

    // Pretends to fetch for a while before rendering.
    let report: ActivityRef<String> = FutureActivity::arc(
        "report",
        |_events: ScopedBus, ctx: CancellationToken| async move {
            tokio::select! {
                _ = ctx.cancelled() => None,
                _ = tokio::time::sleep(Duration::from_millis(200)) => {
                    Some("report: 1942 rows".to_string())
                }
            }
        },
    );

    let dashboard: ActivityRef<String> = FutureActivity::arc(
        "dashboard",
        |_events: ScopedBus, _ctx: CancellationToken| async {
            Some("dashboard: all systems nominal".to_string())
        },
    );

    let manager = ActivityManager::new(
        move |route: &Route| match route {
            Route::Report => Some(report.clone()),
            Route::Dashboard => Some(dashboard.clone()),
        },
        bus.clone(),
    );

    let shown: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let cell = Arc::clone(&shown);
    manager.set_display(Some(Arc::new(move |view: String| {
        println!("[display] {view}");
        *cell.lock().unwrap() = Some(view);
    })))?;

    // Head for the slow report, lose patience, go to the dashboard instead.
    bus.dispatch(&PlaceChanged::new(Route::Report))?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    bus.dispatch(&PlaceChanged::new(Route::Dashboard))?;

    // Give both activations time to resolve; only the dashboard may land.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        shown.lock().unwrap().as_deref(),
        Some("dashboard: all systems nominal")
    );
    println!("[done] the superseded report never reached the display");

    manager.set_display(None)?;
    Ok(())
}
