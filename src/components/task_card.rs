//! Task Card Component
//!
//! One row of the task list.

use chrono::Local;
use leptos::prelude::*;

use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::models::Task;
use crate::routes::Navigator;

#[component]
pub fn TaskCard(task: Task) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let edit_id = task.id.clone();
    let delete_id = task.id.clone();
    let updated = task
        .updated_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string();
    let progress = task.progress().map(|ratio| {
        (
            format!("{}/{} done", task.completed_sub_tasks(), task.sub_tasks.len()),
            format!("width: {:.0}%;", ratio * 100.0),
        )
    });
    let description = (!task.description.is_empty()).then(|| task.description.clone());

    view! {
        <article class="task-card">
            <header class="task-card-header">
                <span class=format!("priority-badge {}", task.priority.as_str())>
                    {task.priority.label()}
                </span>
                <h2 class="task-title">{task.title.clone()}</h2>
            </header>

            {description.map(|text| view! { <p class="task-description">{text}</p> })}

            <div class="task-tags">
                {task.tags.iter().map(|tag| view! {
                    <span class="tag-chip">{tag.clone()}</span>
                }).collect_view()}
            </div>

            {progress.map(|(text, width)| view! {
                <div class="task-progress">
                    <div class="progress-bar"><div class="progress-fill" style=width></div></div>
                    <span class="progress-text">{text}</span>
                </div>
            })}

            <footer class="task-card-footer">
                <span class="task-updated">{updated}</span>
                <button
                    type="button"
                    class="edit-btn"
                    on:click=move |_| ctx.to_edit(&edit_id)
                >
                    "Edit"
                </button>
                <DeleteConfirmButton
                    button_class="delete-btn"
                    prompt="Delete this task?"
                    on_confirm=move |_: ()| {
                        ctx.storage().delete(&delete_id);
                    }
                />
            </footer>
        </article>
    }
}
