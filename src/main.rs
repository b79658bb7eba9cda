use leptos::*;
use serde_json::json;
use web_sys::AbortController;

mod components;
mod error;
mod grid;
mod models;
mod pipeline;
mod state;
mod utils;
mod views;

use components::AppHeader;
use models::{AppStatus, TableData, UploadSource, ViewMode};
use pipeline::run_extraction;
use state::{ScanEvent, ScanState};
use utils::config::AppConfig;
use utils::excel::{download_as_excel, export_file_name, XlsxExporter};
use utils::gemini::GeminiClient;
use utils::log_trace::{log_error, log_info, log_info_with_data, log_warn};
use utils::read_file_payload;
use views::{ApiKeySetup, ErrorPanel, IdleView, ProcessingView, ReviewView};

// ============================================
// アプリ全体の状態コンテキスト
// ============================================

#[derive(Clone, Copy)]
pub struct ScanContext {
    pub state: ReadSignal<ScanState>,
    pub set_state: WriteSignal<ScanState>,
    pub config: ReadSignal<AppConfig>,
    pub set_config: WriteSignal<AppConfig>,
    pub view_mode: ReadSignal<ViewMode>,
    pub set_view_mode: WriteSignal<ViewMode>,
    /// 実行中の抽出リクエスト（新しいアップロード・リセットで中断）
    pub in_flight: StoredValue<Option<AbortController>>,
}

impl ScanContext {
    /// イベントを状態に適用してログに残す。受理されたら true
    fn dispatch(&self, event: ScanEvent) -> bool {
        let name = event.name();
        let category = event_category(&event);
        // 破棄したイベントでは購読側を起こさない
        let next = self.state.with_untracked(|s| s.apply(event));
        let accepted = next.is_some();

        if let Some(s) = next {
            log_info_with_data(
                category,
                &format!("状態遷移: {}", name),
                json!({
                    "status": s.status.label(),
                    "generation": s.generation,
                    "error": s.error,
                }),
            );
            self.set_state.set(s);
        } else {
            log_warn(category, &format!("古い/不正なイベントを破棄: {}", name));
        }
        accepted
    }

    fn abort_in_flight(&self) {
        if let Some(controller) = self.in_flight.get_value() {
            controller.abort();
        }
        self.in_flight.set_value(None);
    }
}

fn event_category(event: &ScanEvent) -> &'static str {
    match event {
        ScanEvent::FileSelected { .. } | ScanEvent::FileRead { .. } | ScanEvent::ReadFailed { .. } => "upload",
        ScanEvent::ExtractionSucceeded { .. } | ScanEvent::ExtractionFailed { .. } => "extract",
        ScanEvent::TableEdited(_) | ScanEvent::Reset => "review",
    }
}

// ============================================
// 処理ハンドラ
// ============================================

/// ファイル受け取りから抽出結果の反映まで
fn handle_file_select(ctx: ScanContext, file: web_sys::File, source: UploadSource) {
    let file_name = file.name();
    log_info_with_data(
        "upload",
        "ファイル選択",
        json!({
            "name": file_name,
            "size": file.size(),
            "type": file.type_(),
            "source": source.label(),
        }),
    );

    // 前のフローは中断し、その結果は世代番号で捨てる
    ctx.abort_in_flight();
    let controller = AbortController::new().ok();
    ctx.in_flight.set_value(controller.clone());

    ctx.dispatch(ScanEvent::FileSelected { file_name });
    let generation = ctx.state.with_untracked(|s| s.generation);
    let config = ctx.config.get_untracked();

    spawn_local(async move {
        let payload = match read_file_payload(file).await {
            Ok(payload) => payload,
            Err(e) => {
                log_error("upload", &e.to_string());
                ctx.dispatch(ScanEvent::ReadFailed { generation });
                return;
            }
        };

        if !ctx.dispatch(ScanEvent::FileRead { generation }) {
            return;
        }

        let mut client = GeminiClient::new(config);
        if let Some(controller) = &controller {
            client = client.with_abort_signal(controller.signal());
        }
        log_info("extract", &format!("抽出リクエスト送信 (model: {})", client.model()));

        let event = run_extraction(&client, generation, &payload, |e| match e {
            error::ScanError::Cancelled => log_warn("extract", &e.to_string()),
            _ => log_error("extract", &e.to_string()),
        })
        .await;

        if let ScanEvent::ExtractionSucceeded { table, .. } = &event {
            log_info_with_data(
                "extract",
                "抽出完了",
                json!({ "columns": table.headers.len(), "rows": table.rows.len() }),
            );
        }
        ctx.dispatch(event);
    });
}

fn handle_download(ctx: ScanContext) {
    let s = ctx.state.get_untracked();
    let Some(table) = s.table else {
        return;
    };
    let name = export_file_name(&s.file_name);
    match download_as_excel(&XlsxExporter, &table, &name) {
        Ok(()) => log_info_with_data(
            "export",
            "Excel出力",
            json!({ "file": name, "rows": table.rows.len() + 1, "columns": table.column_count() }),
        ),
        Err(e) => log_error("export", &e.to_string()),
    }
}

fn handle_reset(ctx: ScanContext) {
    ctx.abort_in_flight();
    ctx.dispatch(ScanEvent::Reset);
}

// ============================================
// メインアプリ
// ============================================

#[component]
fn App() -> impl IntoView {
    let (state, set_state) = create_signal(ScanState::default());
    let (config, set_config) = create_signal(AppConfig::load());
    let (view_mode, set_view_mode) = create_signal(ViewMode::default());
    let in_flight = store_value(None::<AbortController>);

    let ctx = ScanContext {
        state,
        set_state,
        config,
        set_config,
        view_mode,
        set_view_mode,
        in_flight,
    };
    provide_context(ctx);

    if !config.get_untracked().has_api_key() {
        log_warn("config", "APIキーが未設定です");
    }

    // 状態が変わったときだけ画面を切り替える（表の編集では再生成しない）
    let status = create_memo(move |_| state.with(|s| s.status));
    let is_loading = Signal::derive(move || status.get().is_busy());
    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let file_name = Signal::derive(move || state.with(|s| s.file_name.clone()));
    let table = Signal::derive(move || state.with(|s| s.table.clone().unwrap_or_default()));

    let on_file_select = Callback::new(move |(file, source): (web_sys::File, UploadSource)| {
        handle_file_select(ctx, file, source)
    });
    let on_reset = Callback::new(move |_: ()| handle_reset(ctx));
    let on_download = Callback::new(move |_: ()| handle_download(ctx));
    let on_update = Callback::new(move |t: TableData| {
        ctx.dispatch(ScanEvent::TableEdited(t));
    });

    view! {
        <div class="app">
            <AppHeader />

            <main class="container">
                {move || match view_mode.get() {
                    ViewMode::ApiKeySetup => view! { <ApiKeySetup /> }.into_view(),
                    ViewMode::Scanner => view! {
                        <div class="hero">
                            <h1>"Physical Paper to " <span class="accent">"Digital Excel"</span></h1>
                            <p>"Upload a scan or photo of a table and get an editable spreadsheet back."</p>
                        </div>
                        {move || match status.get() {
                            AppStatus::Idle => view! {
                                <IdleView on_file_select=on_file_select is_loading=is_loading />
                            }.into_view(),
                            AppStatus::Preprocessing | AppStatus::Extracting => view! {
                                <ProcessingView status=status />
                            }.into_view(),
                            AppStatus::Review => view! {
                                <ReviewView
                                    file_name=file_name
                                    data=table
                                    on_download=on_download
                                    on_reset=on_reset
                                    on_update=on_update
                                />
                            }.into_view(),
                            AppStatus::Error => view! {
                                <ErrorPanel message=error on_retry=on_reset />
                            }.into_view(),
                        }}
                    }.into_view(),
                }}
            </main>

            // どの状態からでも最初に戻れるボタン
            <button
                class="fab"
                title=move || if status.get() == AppStatus::Idle { "Upload" } else { "Start over" }
                on:click=move |_| {
                    if status.get_untracked() != AppStatus::Idle {
                        on_reset.call(());
                    }
                }
            >
                {move || if status.get() == AppStatus::Idle { "+" } else { "↺" }}
            </button>

            <footer class="app-footer">{footer_text(js_sys::Date::new_0().get_full_year())}</footer>
        </div>
    }
}

fn footer_text(year: u32) -> String {
    format!("© {} ScanTable Pro. Powered by Gemini Flash.", year)
}

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_text() {
        assert_eq!(footer_text(2026), "© 2026 ScanTable Pro. Powered by Gemini Flash.");
    }
}
