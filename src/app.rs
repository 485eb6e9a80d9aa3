//! Task Board App
//!
//! Root component: wires storage into context and switches views by route.

use std::sync::Arc;

use console_logger::LogBuffer;
use leptos::ev;
use leptos::prelude::*;

use crate::components::{TaskForm, TaskList};
use crate::context::{current_hash, AppContext};
use crate::routes::{Navigator, Route};
use crate::storage::{BrowserStorage, KeyValueStore, MemoryStore, TaskStorage};

/// localStorage when the browser allows it, otherwise a session-only store
fn storage_backend() -> Arc<dyn KeyValueStore> {
    if BrowserStorage::is_available() {
        Arc::new(BrowserStorage)
    } else {
        tracing::warn!("local storage unavailable, tasks will not survive a reload");
        Arc::new(MemoryStore::new())
    }
}

#[component]
pub fn App(
    /// Recent log lines, shown in the list view's diagnostics panel
    logs: Option<LogBuffer>,
) -> impl IntoView {
    if let Some(logs) = logs {
        provide_context(logs);
    }
    let hash = current_hash();
    let storage = TaskStorage::new(storage_backend());
    tracing::info!(tasks = storage.load_all().len(), "task board ready");
    let ctx = AppContext::new(storage, Route::parse(&hash));
    provide_context(ctx);

    // Bare URL: canonicalise to the list path
    if Route::parse(&hash) == Route::List && hash != Route::List.path() {
        ctx.to_list();
    }

    // Back/forward buttons and typed URLs; lives as long as the app
    let _hashchange = window_event_listener(ev::hashchange, move |_| ctx.sync_from_location());

    view! {
        <main class="app-layout">
            {move || match ctx.route.get() {
                Route::List => view! { <TaskList /> }.into_any(),
                Route::NewTask => view! { <TaskForm /> }.into_any(),
                Route::EditTask(id) => view! { <TaskForm target=id /> }.into_any(),
            }}
        </main>
    }
}
