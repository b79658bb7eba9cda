//! Gemini API によるテーブル抽出
//!
//! `generateContent` に画像とプロンプトを送り、JSONスキーマで
//! `headers` / `rows` の形に固定した応答を `TableData` に変換する。

use serde::Deserialize;
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Request, RequestInit, RequestMode, Response};

use crate::error::ScanError;
use crate::models::{ImagePayload, TableData};
use crate::pipeline::TableExtractor;
use crate::utils::config::AppConfig;

const EXTRACTION_PROMPT: &str = "You are a precise OCR and table extraction engine. \
Look at the attached scan or photo of a paper document.\n\
1. Find the main table.\n\
2. Transcribe every row and column exactly as printed.\n\
3. Use the table's header row as headers when one exists.\n\
4. Answer with a JSON object with two fields: 'headers' (array of strings) and 'rows' (array of arrays of strings).\n\
Keep cells in their original positions and use empty strings for empty cells.";

/// リクエスト本文を組み立てる
pub fn build_request_body(image: &ImagePayload) -> serde_json::Value {
    json!({
        "contents": [{
            "parts": [
                { "text": EXTRACTION_PROMPT },
                {
                    "inlineData": {
                        "mimeType": image.mime_type,
                        "data": image.base64_data(),
                    }
                }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "headers": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "The column headers of the table"
                    },
                    "rows": {
                        "type": "ARRAY",
                        "items": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        },
                        "description": "The data rows of the table"
                    }
                },
                "required": ["headers", "rows"]
            }
        }
    })
}

// ============================================
// レスポンス型
// ============================================

#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// 最初の候補のテキストを連結してテーブルとして解析
pub fn table_from_response(response: GenerateContentResponse) -> Result<TableData, ScanError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ScanError::EmptyResponse);
    }
    TableData::from_model_json(&text)
}

/// エラー応答からメッセージを取り出す
pub fn api_error(status: u16, body: &str) -> ScanError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status));
    ScanError::Api { status, message }
}

/// 通信失敗のエラー。メッセージが取れなければ定型文
pub fn request_error(message: Option<String>) -> ScanError {
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "Network request failed".to_string());
    ScanError::Request(message)
}

/// JS例外の `message`（文字列が投げられた場合はそのまま）
fn js_error_message(e: &JsValue) -> Option<String> {
    e.dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| e.as_string())
}

// ============================================
// クライアント
// ============================================

pub struct GeminiClient {
    config: AppConfig,
    signal: Option<AbortSignal>,
}

impl GeminiClient {
    pub fn new(config: AppConfig) -> Self {
        Self { config, signal: None }
    }

    /// 新しいアップロードで中断できるようにする
    pub fn with_abort_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn transport_error(&self, e: JsValue) -> ScanError {
        if self.signal.as_ref().is_some_and(AbortSignal::aborted) {
            ScanError::Cancelled
        } else {
            request_error(js_error_message(&e))
        }
    }
}

impl TableExtractor for GeminiClient {
    async fn extract(&self, image: &ImagePayload) -> Result<TableData, ScanError> {
        let api_key = self.config.api_key.as_deref().ok_or(ScanError::MissingApiKey)?;
        let body = build_request_body(image);

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body.to_string()));
        if let Some(signal) = &self.signal {
            opts.set_signal(Some(signal));
        }

        let request = Request::new_with_str_and_init(&self.url(), &opts)
            .map_err(|e| ScanError::Request(format!("Could not create request: {:?}", e)))?;
        let headers = request.headers();
        headers
            .set("Content-Type", "application/json")
            .and_then(|_| headers.set("x-goog-api-key", api_key))
            .map_err(|e| ScanError::Request(format!("Could not set headers: {:?}", e)))?;

        let window = web_sys::window().ok_or_else(|| ScanError::Request("No window available".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| self.transport_error(e))?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ScanError::Request("Unexpected fetch result".into()))?;

        if !resp.ok() {
            let status = resp.status();
            let text = match resp.text() {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .ok()
                    .and_then(|v| v.as_string())
                    .unwrap_or_default(),
                Err(_) => String::new(),
            };
            return Err(api_error(status, &text));
        }

        let json = JsFuture::from(resp.json().map_err(|e| self.transport_error(e))?)
            .await
            .map_err(|e| ScanError::MalformedResponse(format!("{:?}", e)))?;

        let response: GenerateContentResponse = serde_wasm_bindgen::from_value(json)
            .map_err(|e| ScanError::MalformedResponse(e.to_string()))?;

        table_from_response(response)
    }
}
