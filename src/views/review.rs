//! 抽出結果のレビュー画面

use leptos::*;

use crate::components::PreviewTable;
use crate::models::TableData;

#[component]
pub fn ReviewView(
    #[prop(into)] file_name: Signal<String>,
    #[prop(into)] data: Signal<TableData>,
    #[prop(into)] on_download: Callback<()>,
    #[prop(into)] on_reset: Callback<()>,
    #[prop(into)] on_update: Callback<TableData>,
) -> impl IntoView {
    view! {
        <div class="review-view">
            <div class="review-meta">
                <span class="badge success">"✓ Extraction complete"</span>
                <span class="source">"Source: " {move || file_name.get()}</span>
            </div>
            <PreviewTable data=data on_download=on_download on_reset=on_reset on_update=on_update />
        </div>
    }
}
