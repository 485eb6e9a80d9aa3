//! UI Components
//!
//! Leptos views over the task store and form logic.

mod delete_confirm_button;
mod log_panel;
mod priority_selector;
mod task_card;
mod task_list;
mod task_form;

pub use delete_confirm_button::DeleteConfirmButton;
pub use log_panel::LogPanel;
pub use priority_selector::PrioritySelector;
pub use task_card::TaskCard;
pub use task_list::TaskList;
pub use task_form::TaskForm;
