//! Priority Selector Component
//!
//! Select box for picking a task priority.

use leptos::prelude::*;

use crate::models::{Priority, PRIORITIES};

#[component]
pub fn PrioritySelector(
    #[prop(into)] current: Signal<Priority>,
    on_change: impl Fn(Priority) + Copy + 'static,
) -> impl IntoView {
    view! {
        <select
            class=move || format!("priority-select {}", current.get().as_str())
            prop:value=move || current.get().as_str()
            on:change=move |ev| {
                match event_target_value(&ev).parse::<Priority>() {
                    Ok(priority) => on_change(priority),
                    Err(e) => tracing::warn!(error = %e, "ignoring priority change"),
                }
            }
        >
            {PRIORITIES.iter().map(|&priority| {
                view! {
                    <option value=priority.as_str() selected=move || current.get() == priority>
                        {priority.label()}
                    </option>
                }
            }).collect_view()}
        </select>
    }
}
