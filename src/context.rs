//! Application Context
//!
//! Shared state provided via Leptos Context API.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::routes::{Navigator, Route};
use crate::storage::TaskStorage;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Current view - read
    pub route: ReadSignal<Route>,
    /// Current view - write
    set_route: WriteSignal<Route>,
    /// Persistence service
    storage: StoredValue<TaskStorage>,
}

impl AppContext {
    pub fn new(storage: TaskStorage, initial: Route) -> Self {
        let (route, set_route) = signal(initial);
        Self {
            route,
            set_route,
            storage: StoredValue::new(storage),
        }
    }

    pub fn storage(&self) -> TaskStorage {
        self.storage.get_value()
    }

    /// Follow a location hash change made outside the app (back button, typed URL)
    pub fn sync_from_location(&self) {
        let route = Route::parse(&current_hash());
        if self.route.get_untracked() != route {
            tracing::debug!(path = %route.path(), "route changed by location");
            self.set_route.set(route);
        }
    }
}

impl Navigator for AppContext {
    /// Applied on the next tick so a view can navigate while it is being built
    fn navigate(&self, route: Route) {
        let set_route = self.set_route;
        Timeout::new(0, move || {
            tracing::debug!(path = %route.path(), "navigate");
            set_location_hash(&route.path());
            set_route.set(route);
        })
        .forget();
    }
}

/// Location hash without the leading `#`
pub fn current_hash() -> String {
    window()
        .location()
        .hash()
        .map(|hash| hash.trim_start_matches('#').to_string())
        .unwrap_or_default()
}

fn set_location_hash(path: &str) {
    if let Err(e) = window().location().set_hash(path) {
        tracing::warn!(error = ?e, "failed to update location hash");
    }
}
