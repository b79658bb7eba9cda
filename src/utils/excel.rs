//! Excel (xlsx) 出力

use rust_xlsxwriter::Workbook;

use crate::error::ScanError;
use crate::models::TableData;
use crate::pipeline::TableExporter;

pub const SHEET_NAME: &str = "ScannedTable";
pub const DEFAULT_FILE_NAME: &str = "extracted_data.xlsx";
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 列幅の最小文字数（余白を除く）
const MIN_COLUMN_CHARS: usize = 5;
const COLUMN_PADDING: usize = 2;

/// 各列の幅（文字数）。列内の最長セル+2、最小7
pub fn column_widths(table: &TableData) -> Vec<f64> {
    (0..table.column_count())
        .map(|col| {
            let longest = table
                .all_rows()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            (longest.max(MIN_COLUMN_CHARS) + COLUMN_PADDING) as f64
        })
        .collect()
}

/// 元ファイル名から出力ファイル名を作る
///
/// 最初の `.` より前を使い、空白は `_` に置き換える。
pub fn export_file_name(source: &str) -> String {
    let base = source.split('.').next().unwrap_or("").trim();
    if base.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }
    let sanitized = base.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{}.xlsx", sanitized)
}

/// ヘッダー行+データ行を1シートに書き出したxlsxのバイト列
pub fn build_workbook(table: &TableData) -> Result<Vec<u8>, ScanError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

    for (row_idx, row) in table.all_rows().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            worksheet.write_string(row_idx as u32, col_idx as u16, cell.as_str())?;
        }
    }

    for (col_idx, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(col_idx as u16, width)?;
    }

    Ok(workbook.save_to_buffer()?)
}

pub struct XlsxExporter;

impl TableExporter for XlsxExporter {
    fn export(&self, table: &TableData) -> Result<Vec<u8>, ScanError> {
        build_workbook(table)
    }
}

/// xlsxを作ってブラウザでダウンロードさせる
pub fn download_as_excel<X: TableExporter>(exporter: &X, table: &TableData, file_name: &str) -> Result<(), ScanError> {
    let bytes = exporter.export(table)?;
    super::download_bytes(&bytes, XLSX_MIME_TYPE, file_name).map_err(ScanError::Export)
}
