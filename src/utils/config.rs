//! 設定（APIキー・モデル名）
//!
//! ビルド時の環境変数を既定値とし、設定画面で保存したAPIキーがあればそちらを優先する。

const API_KEY_STORAGE_KEY: &str = "scan_table_api_key";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl AppConfig {
    /// ビルド時の値と保存済みキーを解決（ブラウザ上でのみ呼ぶ）
    pub fn load() -> Self {
        Self::resolve(get_saved_api_key(), option_env!("SCAN_TABLE_API_KEY"), option_env!("SCAN_TABLE_MODEL"))
    }

    /// 保存済みキー > ビルド時キー の順で採用
    pub fn resolve(saved_key: Option<String>, build_key: Option<&str>, build_model: Option<&str>) -> Self {
        let api_key = saved_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| build_key.filter(|k| !k.trim().is_empty()).map(str::to_string));
        let model = build_model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_MODEL)
            .to_string();
        Self { api_key, model, ..Self::default() }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn key_source(&self) -> &'static str {
        if get_saved_api_key().is_some() {
            "saved"
        } else if self.api_key.is_some() {
            "build"
        } else {
            "none"
        }
    }
}

/// APIキーを保存（空なら削除）
pub fn save_api_key(key: &str) {
    let key = key.trim();
    if key.is_empty() {
        clear_api_key();
        return;
    }
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(API_KEY_STORAGE_KEY, key);
        }
    }
}

/// 保存済みAPIキーを取得
pub fn get_saved_api_key() -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    let key = storage.get_item(API_KEY_STORAGE_KEY).ok()??;
    if key.is_empty() { None } else { Some(key) }
}

/// 保存済みAPIキーをクリア
pub fn clear_api_key() {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(API_KEY_STORAGE_KEY);
        }
    }
}

/// 表示用に末尾4文字以外を伏せる
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
