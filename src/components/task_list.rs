//! Task List Component
//!
//! Renders the live task collection straight from the store.

use leptos::prelude::*;

use crate::components::{LogPanel, TaskCard};
use crate::context::AppContext;
use crate::routes::Navigator;
use crate::store::TaskStateStoreFields;

#[component]
pub fn TaskList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = ctx.storage().store();

    let is_empty = move || store.tasks().with(|tasks| tasks.is_empty());

    view! {
        <section class="task-list">
            <div class="task-list-header">
                <h1>"Tasks"</h1>
                <button type="button" class="new-task-btn" on:click=move |_| ctx.to_new()>
                    "New task"
                </button>
            </div>

            <Show when=is_empty>
                <p class="empty-state">"No tasks yet. Create one to get started."</p>
            </Show>

            <For
                each=move || store.tasks().get()
                // updated_at in the key so an edited task re-renders
                key=|task| (task.id.clone(), task.updated_at)
                children=move |task| view! { <TaskCard task=task /> }
            />

            <p class="task-count">{move || format!("{} tasks", store.tasks().with(Vec::len))}</p>
            <LogPanel />
        </section>
    }
}
