//! APIキー設定画面

use leptos::*;

use crate::models::ViewMode;
use crate::utils::config::{clear_api_key, mask_api_key, save_api_key, AppConfig};
use crate::utils::log_trace::log_info;
use crate::ScanContext;

#[component]
pub fn ApiKeySetup() -> impl IntoView {
    let ctx = use_context::<ScanContext>().expect("ScanContext not found");
    let config = ctx.config;
    let set_config = ctx.set_config;

    let (key_input, set_key_input) = create_signal(String::new());
    let (message, set_message) = create_signal(None::<String>);

    let on_save = move |_| {
        let key = key_input.get();
        save_api_key(&key);
        let loaded = AppConfig::load();
        log_info("config", &format!("APIキーを更新 (source: {})", loaded.key_source()));
        set_config.set(loaded);
        set_key_input.set(String::new());
        set_message.set(Some(if key.trim().is_empty() { "Saved key removed." } else { "API key saved." }.to_string()));
    };

    let on_clear = move |_| {
        clear_api_key();
        let loaded = AppConfig::load();
        log_info("config", &format!("保存済みAPIキーを削除 (source: {})", loaded.key_source()));
        set_config.set(loaded);
        set_message.set(Some("Saved key removed.".to_string()));
    };

    view! {
        <div class="settings-view">
            <div class="settings-header">
                <h2>"Settings"</h2>
                <button class="back-btn" on:click=move |_| ctx.set_view_mode.set(ViewMode::Scanner)>"← Back"</button>
            </div>

            <div class="form-group">
                <label>"Gemini API key"</label>
                <p class="hint">
                    {move || config.with(|c| match &c.api_key {
                        Some(k) => format!("Current key: {} ({})", mask_api_key(k), c.key_source()),
                        None => "No key configured. Extraction will fail until one is set.".to_string(),
                    })}
                </p>
                <input type="password" placeholder="AIza..."
                    prop:value=move || key_input.get()
                    on:input=move |ev| set_key_input.set(event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label>"Model"</label>
                <p class="hint">{move || config.with(|c| c.model.clone())}</p>
            </div>

            <div class="settings-actions">
                <button class="primary-btn" on:click=on_save>"Save"</button>
                <button class="text-btn" on:click=on_clear>"Remove saved key"</button>
            </div>

            {move || message.get().map(|m| view! { <p class="status success">{m}</p> })}
        </div>
    }
}
