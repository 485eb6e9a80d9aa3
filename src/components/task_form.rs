//! Task Form Component
//!
//! Create/edit form with sub-task and tag editors, inline validation and a
//! debounced draft auto-save. Mode is decided once, when the view mounts.

use leptos::prelude::*;

use crate::components::PrioritySelector;
use crate::context::AppContext;
use crate::form::{self, DraftAutosave, FormMode, TaskFormValue};
use crate::routes::Navigator;
use crate::timers::BrowserScheduler;

/// Copyable bundle of the form's reactive state
#[derive(Clone, Copy)]
struct FormHandle {
    value: RwSignal<TaskFormValue>,
    mode: StoredValue<FormMode>,
    autosave: StoredValue<DraftAutosave<BrowserScheduler>, LocalStorage>,
}

impl FormHandle {
    /// Apply a field change and restart the draft debounce
    fn edit(&self, f: impl FnOnce(&mut TaskFormValue)) {
        self.value.update(f);
        let draft = self
            .mode
            .with_value(|mode| self.value.with_untracked(|value| value.to_draft(mode)));
        self.autosave.with_value(|autosave| autosave.schedule(draft));
    }
}

#[component]
pub fn TaskForm(#[prop(optional)] target: Option<String>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let storage = ctx.storage();

    let Some((mode, initial)) = form::open_form(target.as_deref(), &storage, &ctx) else {
        return view! { <div class="task-form-missing"></div> }.into_any();
    };

    let heading = if mode.is_editing() { "Edit Task" } else { "New Task" };
    let handle = FormHandle {
        value: RwSignal::new(initial),
        mode: StoredValue::new(mode),
        autosave: StoredValue::new_local(DraftAutosave::new(storage, BrowserScheduler)),
    };
    let value = handle.value;
    let saved = handle.autosave.with_value(|autosave| autosave.saved());
    let (show_errors, set_show_errors) = signal(false);
    let errors = Memo::new(move |_| value.with(|v| v.validate()));

    // A pending draft write must not outlive the view
    on_cleanup(move || {
        handle.autosave.try_with_value(|autosave| autosave.cancel());
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_show_errors.set(true);
        let current = value.get_untracked();
        let submitted = handle
            .mode
            .with_value(|mode| form::submit(mode, &current, &ctx.storage(), &ctx));
        if let Some(task) = submitted {
            handle.autosave.with_value(|autosave| autosave.cancel());
            tracing::info!(id = %task.id, "task saved");
        }
    };

    let title_errors = move || {
        show_errors.get().then(|| {
            errors
                .get()
                .title
                .into_iter()
                .map(|error| view! { <p class="field-error">{error.to_string()}</p> })
                .collect_view()
        })
    };

    let sub_task_rows = move || {
        value.with(|v| {
            v.sub_tasks
                .iter()
                .enumerate()
                .map(|(index, sub)| (index, sub.id.clone()))
                .collect::<Vec<_>>()
        })
    };

    let tag_rows = move || value.with(|v| (0..v.tags.len()).collect::<Vec<_>>());

    view! {
        <form class="task-form" on:submit=on_submit>
            <div class="task-form-header">
                <h1>{heading}</h1>
                <Show when=move || saved.get()>
                    <span class="draft-saved">"Draft saved"</span>
                </Show>
            </div>

            <div class="form-section">
                <label class="form-label">"Title"</label>
                <input
                    type="text"
                    class="title-input"
                    placeholder="At least 5 characters"
                    prop:value=move || value.with(|v| v.title.clone())
                    on:input=move |ev| {
                        let title = event_target_value(&ev);
                        handle.edit(|v| v.title = title);
                    }
                    on:blur=move |_| set_show_errors.set(true)
                />
                {title_errors}
            </div>

            <div class="form-section">
                <label class="form-label">"Description"</label>
                <textarea
                    class="description-input"
                    prop:value=move || value.with(|v| v.description.clone())
                    on:input=move |ev| {
                        let description = event_target_value(&ev);
                        handle.edit(|v| v.description = description);
                    }
                ></textarea>
            </div>

            <div class="form-section">
                <label class="form-label">"Priority"</label>
                <PrioritySelector
                    current=Signal::derive(move || value.with(|v| v.priority))
                    on_change=move |priority| handle.edit(|v| v.priority = priority)
                />
            </div>

            <div class="form-section">
                <div class="section-header">
                    <label class="form-label">"Sub-tasks"</label>
                    <button type="button" class="add-btn" on:click=move |_| {
                        let sub_task = ctx.storage().create_sub_task("");
                        handle.edit(|v| v.add_sub_task(sub_task));
                    }>
                        "Add sub-task"
                    </button>
                </div>
                <For
                    each=sub_task_rows
                    key=|row| row.clone()
                    children=move |(index, _)| {
                        let row_errors = move || {
                            show_errors.get().then(|| {
                                errors
                                    .with(|e| e.sub_task(index).to_vec())
                                    .into_iter()
                                    .map(|error| view! { <p class="field-error">{error.to_string()}</p> })
                                    .collect_view()
                            })
                        };
                        view! {
                            <div class="sub-task-row">
                                <input
                                    type="checkbox"
                                    prop:checked=move || value.with(|v| v.sub_tasks.get(index).is_some_and(|s| s.completed))
                                    on:change=move |ev| {
                                        let completed = event_target_checked(&ev);
                                        handle.edit(|v| v.set_sub_task_completed(index, completed));
                                    }
                                />
                                <input
                                    type="text"
                                    class="sub-task-input"
                                    placeholder="Sub-task"
                                    prop:value=move || value.with(|v| {
                                        v.sub_tasks.get(index).map(|s| s.content.clone()).unwrap_or_default()
                                    })
                                    on:input=move |ev| {
                                        let content = event_target_value(&ev);
                                        handle.edit(|v| v.set_sub_task_content(index, content));
                                    }
                                />
                                <button
                                    type="button"
                                    class="remove-btn"
                                    on:click=move |_| handle.edit(|v| { v.remove_sub_task(index); })
                                >
                                    "×"
                                </button>
                                {row_errors}
                            </div>
                        }
                    }
                />
            </div>

            <div class="form-section">
                <div class="section-header">
                    <label class="form-label">"Tags"</label>
                    <button type="button" class="add-btn" on:click=move |_| handle.edit(|v| v.add_tag())>
                        "Add tag"
                    </button>
                </div>
                <div class="tag-rows">
                    <For
                        each=tag_rows
                        key=|index| *index
                        children=move |index| view! {
                            <div class="tag-row">
                                <input
                                    type="text"
                                    class="tag-input"
                                    placeholder="Tag"
                                    prop:value=move || value.with(|v| v.tags.get(index).cloned().unwrap_or_default())
                                    on:input=move |ev| {
                                        let tag = event_target_value(&ev);
                                        handle.edit(|v| v.set_tag(index, tag));
                                    }
                                />
                                <button
                                    type="button"
                                    class="remove-btn"
                                    on:click=move |_| handle.edit(|v| { v.remove_tag(index); })
                                >
                                    "×"
                                </button>
                            </div>
                        }
                    />
                </div>
            </div>

            <div class="form-actions">
                <button type="button" class="cancel-btn" on:click=move |_| ctx.to_list()>
                    "Cancel"
                </button>
                <button type="submit" class="submit-btn">
                    {if handle.mode.with_value(FormMode::is_editing) { "Update" } else { "Create" }}
                </button>
            </div>
        </form>
    }
    .into_any()
}
