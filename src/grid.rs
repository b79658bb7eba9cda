//! レビューグリッドの表示モデルと編集バッファ

use crate::models::TableData;
#[cfg(test)]
use std::rc::Rc;

pub const EMPTY_TABLE_MESSAGE: &str = "No table data found in the image. Try a clearer scan.";

/// 表示用セル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub row: usize,
    pub col: usize,
    pub text: String,
}

/// 表示モードでグリッドに描画する内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    pub headers: Vec<CellView>,
    pub body: Vec<Vec<CellView>>,
}

impl GridModel {
    pub fn from_table(table: &TableData) -> Self {
        let headers = table
            .headers
            .iter()
            .enumerate()
            .map(|(col, text)| CellView { row: 0, col, text: text.clone() })
            .collect();
        let body = table
            .rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, text)| CellView { row, col, text: text.clone() })
                    .collect()
            })
            .collect();
        Self { headers, body }
    }

    /// 行がなければ空表示
    pub fn shows_empty_state(&self) -> bool {
        self.body.is_empty()
    }

    /// ヘッダーも行もなければ表自体を描画しない
    pub fn shows_table(&self) -> bool {
        !(self.headers.is_empty() && self.body.is_empty())
    }

    /// 描画内容からテーブルを復元
    #[cfg(test)]
    pub fn read_back(&self) -> TableData {
        TableData {
            headers: self.headers.iter().map(|c| c.text.clone()).collect(),
            rows: self
                .body
                .iter()
                .map(|r| Rc::new(r.iter().map(|c| c.text.clone()).collect()))
                .collect(),
        }
    }
}

// ============================================
// 編集バッファ
// ============================================

/// 編集モード中の作業コピー
///
/// 保存で下書き全体を確定テーブルに置き換え、キャンセルで元に戻す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    original: TableData,
    draft: TableData,
}

impl EditSession {
    pub fn begin(table: &TableData) -> Self {
        Self { original: table.clone(), draft: table.clone() }
    }

    pub fn draft(&self) -> &TableData {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    pub fn set_header(&mut self, index: usize, value: &str) {
        self.draft = self.draft.with_header(index, value);
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) {
        self.draft = self.draft.with_cell(row, col, value);
    }

    pub fn save(self) -> TableData {
        self.draft
    }

    pub fn cancel(self) -> TableData {
        self.original
    }
}
