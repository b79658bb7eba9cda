//! ファイルアップロード領域
//!
//! ドラッグ&ドロップ、ファイル選択、カメラ撮影の3経路。
//! 種類やサイズの検証はせず、1操作につき1ファイルを渡す。

use leptos::*;
use web_sys::{DragEvent, HtmlInputElement};

use crate::models::UploadSource;

const ACCEPT_DOCUMENTS: &str = "image/*,application/pdf";

#[component]
pub fn FileUploader(
    #[prop(into)] on_file_select: Callback<(web_sys::File, UploadSource)>,
    #[prop(into)] is_loading: Signal<bool>,
) -> impl IntoView {
    let (is_dragging, set_is_dragging) = create_signal(false);
    let file_input_ref = create_node_ref::<html::Input>();
    let camera_input_ref = create_node_ref::<html::Input>();

    let on_drag_over = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragging.set(true);
    };

    let on_drag_leave = move |_: DragEvent| {
        set_is_dragging.set(false);
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragging.set(false);
        if is_loading.get_untracked() {
            return;
        }
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            on_file_select.call((file, UploadSource::DragDrop));
        }
    };

    // input[type=file] の change。同じファイルを再選択できるよう値をクリア
    let on_input_change = move |source: UploadSource| {
        move |ev: web_sys::Event| {
            let input: HtmlInputElement = event_target(&ev);
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                on_file_select.call((file, source));
            }
            input.set_value("");
        }
    };

    let open_picker = move |_| {
        if is_loading.get_untracked() {
            return;
        }
        if let Some(input) = file_input_ref.get() {
            input.click();
        }
    };

    let open_camera = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if is_loading.get_untracked() {
            return;
        }
        if let Some(input) = camera_input_ref.get() {
            input.click();
        }
    };

    view! {
        <div
            class=move || format!(
                "upload-zone {} {}",
                if is_dragging.get() { "dragging" } else { "" },
                if is_loading.get() { "disabled" } else { "" },
            )
            on:dragover=on_drag_over
            on:dragleave=on_drag_leave
            on:drop=on_drop
            on:click=open_picker
        >
            <input
                type="file"
                class="hidden"
                accept=ACCEPT_DOCUMENTS
                node_ref=file_input_ref
                disabled=move || is_loading.get()
                on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
                on:change=on_input_change(UploadSource::Picker)
            />
            <input
                type="file"
                class="hidden"
                accept="image/*"
                capture="environment"
                node_ref=camera_input_ref
                disabled=move || is_loading.get()
                on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
                on:change=on_input_change(UploadSource::Camera)
            />
            <div class="upload-icon">"⬆"</div>
            <h3>"Upload your scan"</h3>
            <p class="upload-hint">
                "Drag and drop your image (JPG, PNG) or PDF here. We'll handle the deskewing and OCR."
            </p>
            <div class="upload-actions">
                <button class="secondary-btn" disabled=move || is_loading.get()>"Select File"</button>
                <button class="secondary-btn" disabled=move || is_loading.get() on:click=open_camera>
                    "Take Photo"
                </button>
            </div>
        </div>
    }
}
