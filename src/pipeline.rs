//! 抽出・出力の差し替え可能な境界と、抽出1回分の処理

use crate::error::ScanError;
use crate::models::{ImagePayload, TableData};
use crate::state::ScanEvent;

/// 画像からテーブルを抽出する外部サービス
#[allow(async_fn_in_trait)]
pub trait TableExtractor {
    async fn extract(&self, image: &ImagePayload) -> Result<TableData, ScanError>;
}

/// テーブルをスプレッドシートのバイト列に変換する
pub trait TableExporter {
    fn export(&self, table: &TableData) -> Result<Vec<u8>, ScanError>;
}

/// 抽出を1回実行して、結果を状態遷移イベントにする
///
/// 失敗時は `on_error` に元のエラーを渡す（ログ用）。
pub async fn run_extraction<E, F>(
    extractor: &E,
    generation: u64,
    image: &ImagePayload,
    on_error: F,
) -> ScanEvent
where
    E: TableExtractor,
    F: FnOnce(&ScanError),
{
    match extractor.extract(image).await {
        Ok(table) => ScanEvent::ExtractionSucceeded { generation, table },
        Err(e) => {
            on_error(&e);
            ScanEvent::ExtractionFailed { generation, message: e.user_message() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppStatus;
    use crate::state::{ScanState, EXTRACTION_FALLBACK_MESSAGE};
    use futures::executor::block_on;

    struct FakeExtractor(Result<TableData, ScanError>);

    impl TableExtractor for FakeExtractor {
        async fn extract(&self, _image: &ImagePayload) -> Result<TableData, ScanError> {
            self.0.clone()
        }
    }

    fn payload() -> ImagePayload {
        ImagePayload { data_url: "data:image/png;base64,AAAA".into(), mime_type: "image/png".into() }
    }

    /// アップロードから抽出結果反映までを通しで実行
    fn scan_with(extractor: &FakeExtractor) -> ScanState {
        let mut state = ScanState::default();
        state.reduce(ScanEvent::FileSelected { file_name: "photo.jpg".into() });
        let generation = state.generation;
        state.reduce(ScanEvent::FileRead { generation });
        let event = block_on(run_extraction(extractor, generation, &payload(), |_| {}));
        state.reduce(event);
        state
    }

    #[test]
    fn test_success_reaches_review() {
        let table = TableData::new(vec!["A".into(), "B".into()], vec![vec!["1".into(), "2".into()]]);
        let state = scan_with(&FakeExtractor(Ok(table.clone())));
        assert_eq!(state.status, AppStatus::Review);
        assert_eq!(state.table, Some(table));
    }

    #[test]
    fn test_rate_limited_message() {
        let err = ScanError::Api { status: 429, message: "rate limited".into() };
        let state = scan_with(&FakeExtractor(Err(err)));
        assert_eq!(state.status, AppStatus::Error);
        assert_eq!(state.error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn test_malformed_output_uses_generic_message() {
        let err = ScanError::MalformedResponse("EOF while parsing".into());
        let state = scan_with(&FakeExtractor(Err(err)));
        assert_eq!(state.error.as_deref(), Some(EXTRACTION_FALLBACK_MESSAGE));
    }

    #[test]
    fn test_empty_extraction_still_reviews() {
        let state = scan_with(&FakeExtractor(Ok(TableData::default())));
        assert_eq!(state.status, AppStatus::Review);
        assert!(state.table.as_ref().is_some_and(TableData::is_empty));
    }

    #[test]
    fn test_stale_result_after_new_upload() {
        let mut state = ScanState::default();
        state.reduce(ScanEvent::FileSelected { file_name: "a.jpg".into() });
        let gen_a = state.generation;
        state.reduce(ScanEvent::FileRead { generation: gen_a });

        state.reduce(ScanEvent::FileSelected { file_name: "b.jpg".into() });
        let gen_b = state.generation;
        state.reduce(ScanEvent::FileRead { generation: gen_b });

        let a = FakeExtractor(Ok(TableData::new(vec!["A".into()], vec![])));
        let b = FakeExtractor(Err(ScanError::Api { status: 500, message: "b failed".into() }));

        // Bが先に終わり、Aが後から届く
        let mut seen = Vec::new();
        assert!(state.reduce(block_on(run_extraction(&b, gen_b, &payload(), |e| seen.push(e.clone())))));
        assert!(!state.reduce(block_on(run_extraction(&a, gen_a, &payload(), |e| seen.push(e.clone())))));
        assert_eq!(seen.len(), 1);
        assert_eq!(state.status, AppStatus::Error);
        assert_eq!(state.error.as_deref(), Some("b failed"));
        assert!(state.table.is_none());
    }
}
