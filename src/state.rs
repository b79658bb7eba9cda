//! スキャン処理の状態遷移
//!
//! 状態は `ScanState` 1つに集約し、遷移は (状態, イベント) -> 新状態 の純粋関数。
//! 非同期処理の結果は開始時の世代番号を持ち回り、世代が古ければ捨てる。

use crate::models::{AppStatus, TableData};

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred during processing.";
pub const EXTRACTION_FALLBACK_MESSAGE: &str =
    "Failed to extract data. Ensure the image is clear and contains a table.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanState {
    pub status: AppStatus,
    pub error: Option<String>,
    pub table: Option<TableData>,
    pub file_name: String,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    FileSelected { file_name: String },
    FileRead { generation: u64 },
    ReadFailed { generation: u64 },
    ExtractionSucceeded { generation: u64, table: TableData },
    ExtractionFailed { generation: u64, message: Option<String> },
    TableEdited(TableData),
    Reset,
}

impl ScanEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ScanEvent::FileSelected { .. } => "file-selected",
            ScanEvent::FileRead { .. } => "file-read",
            ScanEvent::ReadFailed { .. } => "read-failed",
            ScanEvent::ExtractionSucceeded { .. } => "extraction-succeeded",
            ScanEvent::ExtractionFailed { .. } => "extraction-failed",
            ScanEvent::TableEdited(_) => "table-edited",
            ScanEvent::Reset => "reset",
        }
    }
}

impl ScanState {
    /// イベントを適用した新しい状態。受理できなければ `None`
    pub fn apply(&self, event: ScanEvent) -> Option<ScanState> {
        match event {
            ScanEvent::FileSelected { file_name } => Some(ScanState {
                status: AppStatus::Preprocessing,
                error: None,
                table: self.table.clone(),
                file_name,
                generation: self.generation + 1,
            }),
            ScanEvent::FileRead { generation } => {
                self.in_flow(generation, AppStatus::Preprocessing)?;
                Some(ScanState { status: AppStatus::Extracting, ..self.clone() })
            }
            ScanEvent::ReadFailed { generation } => {
                self.in_flow(generation, AppStatus::Preprocessing)?;
                Some(ScanState {
                    status: AppStatus::Error,
                    error: Some(UNEXPECTED_ERROR_MESSAGE.to_string()),
                    ..self.clone()
                })
            }
            ScanEvent::ExtractionSucceeded { generation, table } => {
                self.in_flow(generation, AppStatus::Extracting)?;
                Some(ScanState {
                    status: AppStatus::Review,
                    table: Some(table),
                    ..self.clone()
                })
            }
            ScanEvent::ExtractionFailed { generation, message } => {
                self.in_flow(generation, AppStatus::Extracting)?;
                let message = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| EXTRACTION_FALLBACK_MESSAGE.to_string());
                Some(ScanState {
                    status: AppStatus::Error,
                    error: Some(message),
                    ..self.clone()
                })
            }
            ScanEvent::TableEdited(table) => {
                (self.status == AppStatus::Review).then(|| ScanState {
                    table: Some(table),
                    ..self.clone()
                })
            }
            ScanEvent::Reset => (self.status != AppStatus::Idle).then(|| ScanState {
                status: AppStatus::Idle,
                error: None,
                table: None,
                file_name: self.file_name.clone(),
                generation: self.generation + 1,
            }),
        }
    }

    /// その場で適用。受理されたら true
    pub fn reduce(&mut self, event: ScanEvent) -> bool {
        match self.apply(event) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }

    fn in_flow(&self, generation: u64, status: AppStatus) -> Option<()> {
        (self.generation == generation && self.status == status).then_some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_ab() -> TableData {
        TableData::new(vec!["A".into(), "B".into()], vec![vec!["1".into(), "2".into()]])
    }

    fn select(state: &mut ScanState, name: &str) -> u64 {
        assert!(state.reduce(ScanEvent::FileSelected { file_name: name.to_string() }));
        state.generation
    }

    #[test]
    fn test_happy_path() {
        let mut s = ScanState::default();
        let gen = select(&mut s, "scan.png");
        assert_eq!(s.status, AppStatus::Preprocessing);
        assert!(s.reduce(ScanEvent::FileRead { generation: gen }));
        assert_eq!(s.status, AppStatus::Extracting);
        assert!(s.reduce(ScanEvent::ExtractionSucceeded { generation: gen, table: table_ab() }));
        assert_eq!(s.status, AppStatus::Review);
        assert_eq!(s.table, Some(table_ab()));
        assert_eq!(s.file_name, "scan.png");
    }

    #[test]
    fn test_extraction_failure_message() {
        let mut s = ScanState::default();
        let gen = select(&mut s, "scan.png");
        s.reduce(ScanEvent::FileRead { generation: gen });
        s.reduce(ScanEvent::ExtractionFailed { generation: gen, message: Some("rate limited".into()) });
        assert_eq!(s.status, AppStatus::Error);
        assert_eq!(s.error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn test_extraction_failure_fallback() {
        for message in [None, Some(String::new())] {
            let mut s = ScanState::default();
            let gen = select(&mut s, "scan.png");
            s.reduce(ScanEvent::FileRead { generation: gen });
            s.reduce(ScanEvent::ExtractionFailed { generation: gen, message });
            assert_eq!(s.error.as_deref(), Some(EXTRACTION_FALLBACK_MESSAGE));
        }
    }

    #[test]
    fn test_read_failure_is_generic() {
        let mut s = ScanState::default();
        let gen = select(&mut s, "scan.png");
        assert!(s.reduce(ScanEvent::ReadFailed { generation: gen }));
        assert_eq!(s.status, AppStatus::Error);
        assert_eq!(s.error.as_deref(), Some(UNEXPECTED_ERROR_MESSAGE));
    }

    #[test]
    fn test_reset_clears_table_and_error() {
        let mut s = ScanState::default();
        let gen = select(&mut s, "scan.png");
        s.reduce(ScanEvent::FileRead { generation: gen });
        s.reduce(ScanEvent::ExtractionSucceeded { generation: gen, table: table_ab() });
        assert!(s.reduce(ScanEvent::Reset));
        assert_eq!(s.status, AppStatus::Idle);
        assert!(s.table.is_none());
        assert!(s.error.is_none());
    }

    #[test]
    fn test_retry_from_error() {
        let mut s = ScanState::default();
        let gen = select(&mut s, "scan.png");
        s.reduce(ScanEvent::ReadFailed { generation: gen });
        assert!(s.reduce(ScanEvent::Reset));
        assert_eq!(s.status, AppStatus::Idle);
        assert!(!s.reduce(ScanEvent::Reset));
    }

    #[test]
    fn test_superseded_flow_is_discarded() {
        let mut s = ScanState::default();
        let gen_a = select(&mut s, "a.png");
        s.reduce(ScanEvent::FileRead { generation: gen_a });

        let gen_b = select(&mut s, "b.png");
        assert_ne!(gen_a, gen_b);

        // Aの結果が後から届いても反映しない
        assert!(!s.reduce(ScanEvent::ExtractionSucceeded { generation: gen_a, table: table_ab() }));
        assert_eq!(s.status, AppStatus::Preprocessing);
        assert_eq!(s.file_name, "b.png");

        s.reduce(ScanEvent::FileRead { generation: gen_b });
        let table_b = TableData::new(vec!["X".into()], vec![vec!["9".into()]]);
        assert!(s.reduce(ScanEvent::ExtractionSucceeded { generation: gen_b, table: table_b.clone() }));
        assert_eq!(s.table, Some(table_b));
    }

    #[test]
    fn test_result_after_reset_is_discarded() {
        let mut s = ScanState::default();
        let gen = select(&mut s, "a.png");
        s.reduce(ScanEvent::FileRead { generation: gen });
        s.reduce(ScanEvent::Reset);
        assert!(!s.reduce(ScanEvent::ExtractionFailed { generation: gen, message: None }));
        assert_eq!(s.status, AppStatus::Idle);
        assert!(s.error.is_none());
    }

    #[test]
    fn test_out_of_order_events_rejected() {
        let mut s = ScanState::default();
        let gen = select(&mut s, "a.png");
        // 読込完了前の抽出結果は受け付けない
        assert!(!s.reduce(ScanEvent::ExtractionSucceeded { generation: gen, table: table_ab() }));
        assert!(!s.reduce(ScanEvent::TableEdited(table_ab())));
        assert_eq!(s.status, AppStatus::Preprocessing);
    }

    #[test]
    fn test_table_edit_replaces_wholesale() {
        let mut s = ScanState::default();
        let gen = select(&mut s, "a.png");
        s.reduce(ScanEvent::FileRead { generation: gen });
        s.reduce(ScanEvent::ExtractionSucceeded { generation: gen, table: table_ab() });
        let edited = table_ab().with_cell(0, 1, "x");
        assert!(s.reduce(ScanEvent::TableEdited(edited.clone())));
        assert_eq!(s.table, Some(edited));
        assert_eq!(s.status, AppStatus::Review);
    }

    #[test]
    fn test_apply_is_pure() {
        let s = ScanState::default();
        let next = s.apply(ScanEvent::FileSelected { file_name: "a.png".into() }).unwrap();
        assert_eq!(s, ScanState::default());
        assert_eq!(next.generation, 1);
    }
}
