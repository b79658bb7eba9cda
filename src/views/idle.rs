//! 待機画面（アップロード領域と機能紹介）

use leptos::*;

use crate::components::FileUploader;
use crate::models::UploadSource;

const FEATURES: &[(&str, &str)] = &[
    ("AI Deskewing", "Automatically fixes tilted scans and camera photos for perfect table alignment."),
    ("Manual Correction", "Fix extraction errors instantly with our intuitive inline spreadsheet-style editor."),
    ("Privacy First", "Files are processed in-memory and never stored. Your document's security is our priority."),
];

#[component]
pub fn IdleView(
    #[prop(into)] on_file_select: Callback<(web_sys::File, UploadSource)>,
    #[prop(into)] is_loading: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="idle-view">
            <FileUploader on_file_select=on_file_select is_loading=is_loading />
            <div class="feature-grid">
                {FEATURES.iter().map(|(title, body)| view! {
                    <div class="feature-card">
                        <h4>{*title}</h4>
                        <p>{*body}</p>
                    </div>
                }).collect_view()}
            </div>
        </div>
    }
}
