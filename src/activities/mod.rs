//! Activity abstractions and place → activity resolution.
//!
//! This module provides the activity-side types:
//! - [`Activity`] — trait for implementing navigation-target controllers
//! - [`ActivityRef`] — shared reference to an activity (`Arc<dyn Activity>`)
//! - [`ActivityMapper`] — the routing boundary, plus the [`CachingMapper`]
//!   and [`FilteredMapper`] combinators
//! - [`FutureActivity`] — future-backed activity (feature `async`)

mod activity;
mod mapper;

#[cfg(feature = "async")]
mod future;

pub use activity::{Activity, ActivityRef};
pub use mapper::{ActivityMapper, CachingMapper, FilteredMapper};

#[cfg(feature = "async")]
pub use future::FutureActivity;
