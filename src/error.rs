//! エラー型

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("API key is not configured. Set GEMINI_API_KEY or enter a key in Settings.")]
    MissingApiKey,

    #[error("{0}")]
    Request(String),

    /// APIが返したエラー。表示はAPIのメッセージそのまま
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("the model returned no table text")]
    EmptyResponse,

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("failed to read file: {0}")]
    FileRead(String),

    #[error("failed to build spreadsheet: {0}")]
    Export(String),

    #[error("request was cancelled")]
    Cancelled,
}

impl ScanError {
    /// ユーザーに見せるメッセージ
    ///
    /// `None` の場合は呼び出し側で汎用メッセージにフォールバックする。
    /// モデル出力の解析失敗はここで汎用扱いになる。
    pub fn user_message(&self) -> Option<String> {
        match self {
            ScanError::MalformedResponse(_) | ScanError::EmptyResponse => None,
            ScanError::Api { message, .. } if message.trim().is_empty() => None,
            ScanError::Request(message) if message.trim().is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ScanError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ScanError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(e: serde_json::Error) -> Self {
        ScanError::MalformedResponse(e.to_string())
    }
}
