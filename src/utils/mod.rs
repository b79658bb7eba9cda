//! ユーティリティモジュール

pub mod config;
pub mod excel;
pub mod gemini;
pub mod log_trace;

use base64::Engine;
use wasm_bindgen::JsCast;

use crate::error::ScanError;
use crate::models::{guess_mime_type, ImagePayload};

// 共通ヘルパー

/// バイト列をdata URLに変換
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime_type, encoded)
}

/// ブラウザが返したMIMEタイプ（空なら拡張子から推定）
pub fn resolve_mime_type(reported: &str, file_name: &str) -> String {
    if reported.is_empty() {
        guess_mime_type(file_name).to_string()
    } else {
        reported.to_string()
    }
}

/// アップロードされたファイルを読み込んでdata URLにする
pub async fn read_file_payload(file: web_sys::File) -> Result<ImagePayload, ScanError> {
    let mime_type = resolve_mime_type(&file.type_(), &file.name());
    let file = gloo::file::File::from(file);
    let bytes = gloo::file::futures::read_as_bytes(&file)
        .await
        .map_err(|e| ScanError::FileRead(e.to_string()))?;
    Ok(ImagePayload {
        data_url: encode_data_url(&mime_type, &bytes),
        mime_type,
    })
}

/// バイト列をファイルとしてダウンロードさせる
pub fn download_bytes(bytes: &[u8], mime_type: &str, file_name: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("windowがありません")?;
    let document = window.document().ok_or("documentがありません")?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime_type);

    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| format!("Blob作成失敗: {:?}", e))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("URL作成失敗: {:?}", e))?;

    let a = document
        .create_element("a")
        .map_err(|e| format!("要素作成失敗: {:?}", e))?;
    let _ = a.set_attribute("href", &url);
    let _ = a.set_attribute("download", file_name);
    if let Some(element) = a.dyn_ref::<web_sys::HtmlElement>() {
        element.click();
    }
    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_data_url() {
        assert_eq!(encode_data_url("image/png", b"ABC"), "data:image/png;base64,QUJD");
    }

    #[test]
    fn test_data_url_round_trips_through_payload() {
        let payload = ImagePayload {
            data_url: encode_data_url("application/pdf", b"%PDF"),
            mime_type: "application/pdf".into(),
        };
        assert_eq!(payload.base64_data(), "JVBERg==");
    }

    #[test]
    fn test_resolve_mime_type() {
        assert_eq!(resolve_mime_type("image/png", "x.jpg"), "image/png");
        assert_eq!(resolve_mime_type("", "x.jpg"), "image/jpeg");
    }
}
