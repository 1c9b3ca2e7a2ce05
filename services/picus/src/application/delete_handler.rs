/// 削除ハンドラー
///
/// ALBターゲットグループ経由でLambdaが呼び出された際に、
/// パスからレコードIDを取り出してDynamoDBから削除する。
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::domain::extract_record_id;
use crate::infrastructure::RecordRepository;

/// ALBターゲットグループ形式のレスポンスを生成
///
/// # 引数
/// * `status_code` - HTTPステータスコード
/// * `body` - レスポンスボディ（JSON文字列としてシリアライズされる）
pub fn alb_response(status_code: u16, body: Value) -> Value {
    let status_description = if status_code < 400 {
        format!("{} OK", status_code)
    } else {
        format!("{} Error", status_code)
    };

    json!({
        "statusCode": status_code,
        "statusDescription": status_description,
        "isBase64Encoded": false,
        "headers": {
            "Content-Type": "application/json",
        },
        "body": body.to_string(),
    })
}

/// レコード削除リクエストを処理するハンドラー
pub struct DeleteHandler<R>
where
    R: RecordRepository,
{
    /// レコードリポジトリ
    repository: R,
}

impl<R> DeleteHandler<R>
where
    R: RecordRepository,
{
    /// 新しいDeleteHandlerを作成
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// 削除リクエストを処理
    ///
    /// # 処理フロー
    /// 1. イベントの`path`フィールドを取得（欠落時は空文字）
    /// 2. 末尾セグメントからレコードIDを抽出
    /// 3. DynamoDBから削除
    ///
    /// # 戻り値
    /// ALBレスポンス:
    /// - 200: `{"deleted": id}`
    /// - 400: パスにIDが含まれていない
    /// - 500: DynamoDB削除失敗（`detail`にエラー内容）
    pub async fn handle(&self, event: &Value) -> Value {
        let path = event.get("path").and_then(|v| v.as_str()).unwrap_or("");

        let record_id = match extract_record_id(path) {
            Ok(id) => id,
            Err(err) => {
                warn!(path = path, error = %err, "削除対象のIDがパスに含まれていない");
                return alb_response(400, json!({ "error": err.to_string() }));
            }
        };

        match self.repository.delete_by_id(record_id).await {
            Ok(()) => {
                info!(record_id = record_id, "レコードを削除");
                alb_response(200, json!({ "deleted": record_id }))
            }
            Err(err) => {
                error!(record_id = record_id, error = %err, "レコード削除エラー");
                alb_response(
                    500,
                    json!({
                        "error": "DynamoDB delete failed",
                        "detail": err.to_string(),
                    }),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, RecordPayload};
    use crate::infrastructure::logging::init_test_logging;
    use crate::testing::MockRecordRepository;
    use crate::infrastructure::RecordRepositoryError;
    use chrono::Utc;

    // ==================== テストヘルパー ====================

    fn create_test_handler() -> (DeleteHandler<MockRecordRepository>, MockRecordRepository) {
        init_test_logging();
        let repo = MockRecordRepository::new();
        (DeleteHandler::new(repo.clone()), repo)
    }

    fn alb_event(path: &str) -> Value {
        json!({
            "httpMethod": "DELETE",
            "path": path,
            "headers": {},
            "body": "",
            "isBase64Encoded": false
        })
    }

    fn parse_body(response: &Value) -> Value {
        serde_json::from_str(response["body"].as_str().unwrap()).unwrap()
    }

    // ==================== alb_response ====================

    #[test]
    fn test_alb_response_success_envelope() {
        let response = alb_response(200, json!({"deleted": "1"}));

        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["statusDescription"], "200 OK");
        assert_eq!(response["isBase64Encoded"], false);
        assert_eq!(response["headers"]["Content-Type"], "application/json");
        assert_eq!(response["body"], r#"{"deleted":"1"}"#);
    }

    #[test]
    fn test_alb_response_error_description() {
        assert_eq!(alb_response(400, json!({}))["statusDescription"], "400 Error");
        assert_eq!(alb_response(500, json!({}))["statusDescription"], "500 Error");
    }

    // ==================== handle ====================

    #[tokio::test]
    async fn test_handle_deletes_record() {
        let (handler, repo) = create_test_handler();
        repo.insert(Record::with_id("123", RecordPayload::new(), Utc::now()));

        let response = handler.handle(&alb_event("/picus/123")).await;

        assert_eq!(response["statusCode"], 200);
        assert_eq!(parse_body(&response), json!({"deleted": "123"}));
        assert!(!repo.contains("123"));
    }

    // 存在しないIDの削除も成功する（冪等）
    #[tokio::test]
    async fn test_handle_missing_record_is_success() {
        let (handler, repo) = create_test_handler();

        let response = handler.handle(&alb_event("/picus/does-not-exist")).await;

        assert_eq!(response["statusCode"], 200);
        assert_eq!(parse_body(&response), json!({"deleted": "does-not-exist"}));
        assert_eq!(repo.record_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_trailing_slash() {
        let (handler, repo) = create_test_handler();
        repo.insert(Record::with_id("abc", RecordPayload::new(), Utc::now()));

        let response = handler.handle(&alb_event("/picus/abc/")).await;

        assert_eq!(response["statusCode"], 200);
        assert_eq!(parse_body(&response), json!({"deleted": "abc"}));
        assert!(!repo.contains("abc"));
    }

    #[tokio::test]
    async fn test_handle_collection_path_is_bad_request() {
        let (handler, _repo) = create_test_handler();

        for path in ["/picus", "/picus/"] {
            let response = handler.handle(&alb_event(path)).await;

            assert_eq!(response["statusCode"], 400, "path: {}", path);
            assert_eq!(
                parse_body(&response),
                json!({"error": "Missing key in path, expected /picus/{key}"})
            );
        }
    }

    // pathフィールドが欠落・nullの場合も400
    #[tokio::test]
    async fn test_handle_missing_path_is_bad_request() {
        let (handler, _repo) = create_test_handler();

        let response = handler.handle(&json!({"httpMethod": "DELETE"})).await;
        assert_eq!(response["statusCode"], 400);

        let response = handler.handle(&json!({"path": null})).await;
        assert_eq!(response["statusCode"], 400);
    }

    // 不正なパスではストアを呼び出さない
    #[tokio::test]
    async fn test_handle_bad_request_does_not_touch_store() {
        let (handler, repo) = create_test_handler();
        repo.insert(Record::with_id("picus", RecordPayload::new(), Utc::now()));

        let response = handler.handle(&alb_event("/picus")).await;

        assert_eq!(response["statusCode"], 400);
        assert!(repo.contains("picus"));
    }

    #[tokio::test]
    async fn test_handle_store_failure_is_server_error() {
        let (handler, repo) = create_test_handler();
        repo.set_next_error(RecordRepositoryError::WriteError(
            "ProvisionedThroughputExceeded".to_string(),
        ));

        let response = handler.handle(&alb_event("/picus/123")).await;

        assert_eq!(response["statusCode"], 500);
        assert_eq!(response["statusDescription"], "500 Error");
        let body = parse_body(&response);
        assert_eq!(body["error"], "DynamoDB delete failed");
        assert_eq!(body["detail"], "Write error: ProvisionedThroughputExceeded");
    }
}
