//! 抽出結果のプレビュー・編集テーブル

use leptos::*;
use serde_json::json;
use wasm_bindgen::JsCast;
use web_sys::HtmlTextAreaElement;

use crate::grid::{EditSession, GridModel, EMPTY_TABLE_MESSAGE};
use crate::models::TableData;
use crate::utils::log_trace::log_info_with_data;

#[component]
pub fn PreviewTable(
    #[prop(into)] data: Signal<TableData>,
    #[prop(into)] on_download: Callback<()>,
    #[prop(into)] on_reset: Callback<()>,
    #[prop(into)] on_update: Callback<TableData>,
) -> impl IntoView {
    // 入力ごとに再描画するとフォーカスが外れるので、下書きは非リアクティブに保持
    let editing = create_rw_signal(false);
    let session = store_value(None::<EditSession>);

    // 新しいスキャン結果が来たら編集を破棄
    create_effect(move |_| {
        data.with(|_| ());
        session.set_value(None);
        editing.set(false);
    });

    let start_edit = move |_| {
        session.set_value(Some(EditSession::begin(&data.get_untracked())));
        editing.set(true);
    };

    let save_changes = move |_| {
        if let Some(s) = session.get_value() {
            log_info_with_data(
                "review",
                "編集を保存",
                json!({ "changed": s.is_dirty(), "rows": s.draft().rows.len() }),
            );
            session.set_value(None);
            editing.set(false);
            on_update.call(s.save());
        }
    };

    let cancel_changes = move |_| {
        if let Some(s) = session.get_value() {
            let dirty = s.is_dirty();
            let restored = s.cancel();
            log_info_with_data(
                "review",
                "編集をキャンセル",
                json!({ "discarded_changes": dirty, "rows": restored.rows.len() }),
            );
        }
        session.set_value(None);
        editing.set(false);
    };

    let on_header_input = move |col: usize, value: String| {
        session.update_value(|s| {
            if let Some(s) = s {
                s.set_header(col, &value);
            }
        });
    };

    let on_cell_input = move |row: usize, col: usize, value: String| {
        session.update_value(|s| {
            if let Some(s) = s {
                s.set_cell(row, col, &value);
            }
        });
    };

    view! {
        <div class="preview-table">
            <div class="preview-toolbar">
                <div>
                    <h3>"Extraction Results"</h3>
                    <p class="hint">
                        {move || if editing.get() {
                            "Editing mode: click on any cell to modify its content."
                        } else {
                            "Review and verify the data before downloading."
                        }}
                    </p>
                </div>
                <div class="toolbar-actions">
                    {move || if editing.get() {
                        view! {
                            <button class="text-btn" on:click=cancel_changes>"Cancel"</button>
                            <button class="primary-btn" on:click=save_changes>"Save Changes"</button>
                        }.into_view()
                    } else {
                        view! {
                            <button class="text-btn" on:click=move |_| on_reset.call(())>"Discard"</button>
                            <button class="edit-btn" on:click=start_edit>"Edit Data"</button>
                            <button class="download-btn" on:click=move |_| on_download.call(())>
                                "Download Excel"
                            </button>
                        }.into_view()
                    }}
                </div>
            </div>

            {move || {
                let model = data.with(GridModel::from_table);
                let is_editing = editing.get();
                let shows_empty = model.shows_empty_state();
                let table = model.shows_table().then(|| view! {
                    <div class="table-scroll">
                        <table class="grid">
                            <thead>
                                <tr>
                                    {model.headers.into_iter().map(|h| {
                                        let col = h.col;
                                        view! {
                                            <th>
                                                {if is_editing {
                                                    view! {
                                                        <input type="text" class="header-input"
                                                            prop:value=h.text
                                                            on:input=move |ev| on_header_input(col, event_target_value(&ev))
                                                        />
                                                    }.into_view()
                                                } else {
                                                    view! { <div class="cell-text">{h.text}</div> }.into_view()
                                                }}
                                            </th>
                                        }
                                    }).collect_view()}
                                </tr>
                            </thead>
                            <tbody>
                                {model.body.into_iter().map(|row| view! {
                                    <tr>
                                        {row.into_iter().map(|cell| {
                                            let (r, c) = (cell.row, cell.col);
                                            view! {
                                                <td>
                                                    {if is_editing {
                                                        view! {
                                                            <textarea rows="1" class="cell-input"
                                                                prop:value=cell.text
                                                                on:input=move |ev| {
                                                                    if let Some(value) = grow_and_read(&ev) {
                                                                        on_cell_input(r, c, value);
                                                                    }
                                                                }
                                                            ></textarea>
                                                        }.into_view()
                                                    } else {
                                                        view! { <div class="cell-text">{cell.text}</div> }.into_view()
                                                    }}
                                                </td>
                                            }
                                        }).collect_view()}
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                });
                view! {
                    {table}
                    {shows_empty.then(|| view! {
                        <div class="empty-state">{EMPTY_TABLE_MESSAGE}</div>
                    })}
                }
            }}
        </div>
    }
}

/// テキストエリアを内容に合わせて伸ばし、値を返す
fn grow_and_read(ev: &web_sys::Event) -> Option<String> {
    let area = ev.target()?.dyn_into::<HtmlTextAreaElement>().ok()?;
    let style = area.style();
    let _ = style.set_property("height", "auto");
    let _ = style.set_property("height", &format!("{}px", area.scroll_height()));
    Some(area.value())
}
