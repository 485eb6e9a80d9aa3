//! Log Panel Component
//!
//! Collapsible view of the logger's recent lines. Renders nothing when no
//! log buffer was provided.

use console_logger::LogBuffer;
use leptos::prelude::*;

#[component]
pub fn LogPanel() -> impl IntoView {
    let Some(logs) = use_context::<LogBuffer>() else {
        return ().into_any();
    };
    let (lines, set_lines) = signal(Vec::<String>::new());

    view! {
        <details class="log-panel">
            // Snapshot on open; the buffer itself is not reactive
            <summary on:click=move |_| set_lines.set(logs.lines())>
                "Recent logs"
            </summary>
            <pre class="log-lines">{move || lines.get().join("\n")}</pre>
        </details>
    }
    .into_any()
}
