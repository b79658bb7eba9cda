//! エラー表示

use leptos::*;

#[component]
pub fn ErrorPanel(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(into)] on_retry: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="error-panel">
            <div class="error-icon">"!"</div>
            <h3>"Something went wrong"</h3>
            <p class="error-message">
                {move || message.get().unwrap_or_else(|| "An error occurred while processing the file.".to_string())}
            </p>
            <button class="danger-btn" on:click=move |_| on_retry.call(())>"Try Again"</button>
        </div>
    }
}
