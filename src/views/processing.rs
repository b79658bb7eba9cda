//! 読込・抽出中の進捗表示

use leptos::*;

use crate::models::AppStatus;

/// 状態ごとの見出しと進捗バーの幅(%)
pub fn progress_copy(status: AppStatus) -> (&'static str, u8) {
    match status {
        AppStatus::Preprocessing => ("Enhancing Image...", 30),
        _ => ("Analyzing Table Structure...", 75),
    }
}

#[component]
pub fn ProcessingView(#[prop(into)] status: Signal<AppStatus>) -> impl IntoView {
    view! {
        <div class="processing-view">
            <div class="spinner"></div>
            <h3>{move || progress_copy(status.get()).0}</h3>
            <p class="hint">"This usually takes about 5-10 seconds depending on complexity."</p>
            <div class="progress-bar">
                <div
                    class="progress-fill"
                    style=move || format!("width: {}%", progress_copy(status.get()).1)
                ></div>
            </div>
        </div>
    }
}
