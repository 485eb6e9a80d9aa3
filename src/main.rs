//! Task Board Frontend Entry Point

mod models;
mod validators;
mod store;
mod storage;
mod routes;
mod timers;
mod form;
mod context;
mod components;
mod app;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let logs = match console_logger::init_logger("TaskBoard", console_logger::DEFAULT_CAPACITY) {
        Ok(buffer) => Some(buffer),
        Err(e) => {
            web_sys::console::error_1(&format!("logger init failed: {}", e).into());
            None
        }
    };
    mount_to_body(move || view! { <App logs=logs.clone() /> });
}
