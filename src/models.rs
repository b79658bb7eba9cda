//! データ構造体モジュール

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

// ============================================
// 抽出テーブル
// ============================================

/// 1行分のセル。編集していない行は複製元と共有する
pub type Row = Rc<Vec<String>>;

/// 画像から抽出したテーブル
///
/// 各行のセル数は `headers.len()` と一致するのが前提だが強制はしない。
/// 不揃いな行はそのまま表示・出力する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl TableData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows: rows.into_iter().map(Rc::new).collect() }
    }

    /// モデルが返したJSONテキストを解析
    ///
    /// `headers` と `rows` は両方必須。
    pub fn from_model_json(text: &str) -> Result<Self, ScanError> {
        let table: TableData = serde_json::from_str(text.trim())?;
        Ok(table)
    }

    /// データ行がなければ空扱い（ヘッダーのみでも空）
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// ヘッダー数と最長行のうち大きい方
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// ヘッダー行に続けてデータ行
    pub fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.headers).chain(self.rows.iter().map(|r| &**r))
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }

    /// ヘッダー1つを差し替えた新しいテーブル（範囲外は変更なし）
    ///
    /// 行は共有したまま。
    pub fn with_header(&self, index: usize, value: &str) -> Self {
        let mut next = self.clone();
        if let Some(h) = next.headers.get_mut(index) {
            *h = value.to_string();
        }
        next
    }

    /// セル1つを差し替えた新しいテーブル（範囲外は変更なし）
    ///
    /// 複製するのは対象の行だけで、他の行は共有したまま。
    pub fn with_cell(&self, row: usize, col: usize, value: &str) -> Self {
        let mut next = self.clone();
        if let Some(target) = next.rows.get_mut(row).filter(|r| col < r.len()) {
            Rc::make_mut(target)[col] = value.to_string();
        }
        next
    }
}

// ============================================
// アプリ状態
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppStatus {
    #[default]
    Idle,
    Preprocessing,
    Extracting,
    Review,
    Error,
}

impl AppStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AppStatus::Idle => "idle",
            AppStatus::Preprocessing => "preprocessing",
            AppStatus::Extracting => "extracting",
            AppStatus::Review => "review",
            AppStatus::Error => "error",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, AppStatus::Preprocessing | AppStatus::Extracting)
    }
}

// ============================================
// アップロード
// ============================================

/// どの入力経路からファイルが来たか（ログ用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSource {
    DragDrop,
    Picker,
    Camera,
}

impl UploadSource {
    pub fn label(&self) -> &'static str {
        match self {
            UploadSource::DragDrop => "drag-drop",
            UploadSource::Picker => "picker",
            UploadSource::Camera => "camera",
        }
    }
}

/// 抽出APIに送る画像/PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data_url: String,
    pub mime_type: String,
}

impl ImagePayload {
    /// data URLのカンマ以降（カンマがなければ全体）
    pub fn base64_data(&self) -> &str {
        match self.data_url.split_once(',') {
            Some((_, data)) => data,
            None => &self.data_url,
        }
    }
}

/// ブラウザがMIMEタイプを返さなかった場合に拡張子から推定
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    let ext = lower.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
    match ext {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

// ============================================
// ビューモード
// ============================================

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Scanner,
    ApiKeySetup,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableData {
        TableData::new(
            vec!["A".into(), "B".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]],
        )
    }

    #[test]
    fn test_from_model_json() {
        let t = TableData::from_model_json(r#"{"headers":["A","B"],"rows":[["1","2"]]}"#).unwrap();
        assert_eq!(t.headers, vec!["A", "B"]);
        assert_eq!(t.rows.len(), 1);
        assert_eq!(*t.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn test_from_model_json_requires_both_fields() {
        assert!(matches!(
            TableData::from_model_json(r#"{"headers":["A"]}"#),
            Err(ScanError::MalformedResponse(_))
        ));
        assert!(TableData::from_model_json("not json").is_err());
    }

    #[test]
    fn test_empty_table() {
        let t = TableData::from_model_json(r#"{"headers":[],"rows":[]}"#).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.column_count(), 0);
    }

    #[test]
    fn test_column_count_ragged() {
        let t = TableData::new(
            vec!["A".into()],
            vec![vec!["1".into(), "2".into(), "3".into()], vec![]],
        );
        assert_eq!(t.column_count(), 3);
    }

    #[test]
    fn test_with_cell_only_touches_target() {
        let t = sample();
        let edited = t.with_cell(1, 0, "x");
        assert_eq!(edited.cell(1, 0), Some("x"));
        assert_eq!(edited.headers, t.headers);
        assert_eq!(t.cell(1, 0), Some("3"));
        assert!(Rc::ptr_eq(&edited.rows[0], &t.rows[0]));
        assert!(!Rc::ptr_eq(&edited.rows[1], &t.rows[1]));
    }

    #[test]
    fn test_header_edit_shares_all_rows() {
        let t = sample();
        let edited = t.with_header(0, "Name");
        assert_eq!(edited.headers, vec!["Name", "B"]);
        assert!(edited.rows.iter().zip(&t.rows).all(|(a, b)| Rc::ptr_eq(a, b)));
    }

    #[test]
    fn test_all_rows_starts_with_headers() {
        let t = sample();
        let rows: Vec<_> = t.all_rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(*rows[0], t.headers);
        assert_eq!(*rows[2], vec!["3", "4"]);
    }

    #[test]
    fn test_out_of_range_edit_is_noop() {
        let t = sample();
        assert_eq!(t.with_cell(5, 0, "x"), t);
        assert_eq!(t.with_header(9, "x"), t);
    }

    #[test]
    fn test_base64_data() {
        let p = ImagePayload { data_url: "data:image/png;base64,QUJD".into(), mime_type: "image/png".into() };
        assert_eq!(p.base64_data(), "QUJD");
        let raw = ImagePayload { data_url: "QUJD".into(), mime_type: "image/png".into() };
        assert_eq!(raw.base64_data(), "QUJD");
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("Scan 01.JPG"), "image/jpeg");
        assert_eq!(guess_mime_type("sheet.pdf"), "application/pdf");
        assert_eq!(guess_mime_type("noext"), "application/octet-stream");
    }
}
