//! UIコンポーネントモジュール

pub mod file_uploader;
pub mod header;
pub mod preview_table;

pub use file_uploader::FileUploader;
pub use header::AppHeader;
pub use preview_table::PreviewTable;
