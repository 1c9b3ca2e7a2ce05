//! 統合テスト共通ヘルパー

use std::sync::Arc;

use axum::Router;
use picus::testing::MockRecordRepository;
use picus_api::create_router;

/// モックリポジトリ付きのルーターを作成
pub fn create_test_app() -> (Router, MockRecordRepository) {
    let repo = MockRecordRepository::new();
    let app = create_router(Arc::new(repo.clone()));
    (app, repo)
}
