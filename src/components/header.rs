//! アプリヘッダー

use leptos::*;

use crate::models::ViewMode;
use crate::utils::log_trace::{clear_logs, download_logs};
use crate::ScanContext;

#[component]
pub fn AppHeader() -> impl IntoView {
    let ctx = use_context::<ScanContext>().expect("ScanContext not found");
    let view_mode = ctx.view_mode;
    let set_view_mode = ctx.set_view_mode;

    let toggle_settings = move |_| {
        let next = match view_mode.get_untracked() {
            ViewMode::Scanner => ViewMode::ApiKeySetup,
            ViewMode::ApiKeySetup => ViewMode::Scanner,
        };
        set_view_mode.set(next);
    };

    view! {
        <header class="app-header">
            <div class="brand">
                <span class="brand-mark">"▦"</span>
                <span class="brand-name">"ScanTable " <span class="accent">"Pro"</span></span>
            </div>
            <nav class="header-nav">
                <button class="nav-btn" on:click=move |_| download_logs()>"Logs"</button>
                <button class="nav-btn" on:click=move |_| clear_logs()>"Clear Logs"</button>
                <button
                    class=move || if view_mode.get() == ViewMode::ApiKeySetup { "nav-btn active" } else { "nav-btn" }
                    on:click=toggle_settings
                >
                    "Settings"
                </button>
            </nav>
        </header>
    }
}
