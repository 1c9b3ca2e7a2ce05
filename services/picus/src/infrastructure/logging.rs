/// ログ基盤モジュール
///
/// API サーバー（ECS）と削除Lambdaで共通の構造化ログ設定を提供する。
/// CloudWatch Logs Insightsでフィールド検索できるよう、1行1イベントのJSONで出力する。
use std::sync::Once;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// JSON出力レイヤーを構築する
///
/// イベントのフィールドはトップレベルに展開し（`flatten_event`）、
/// スパン情報は出力しない。
fn json_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(make_writer)
}

/// ログサブスクライバーを初期化する
///
/// `RUST_LOG`（未設定時は`info`）でフィルタリングし、標準出力にJSONで書き出す。
/// 複数回呼び出しても最初の1回のみ初期化する。
///
/// # 使用例
/// ```ignore
/// use picus::infrastructure::init_logging;
///
/// init_logging();
/// tracing::info!(record_id = "123", "レコードを削除");
/// ```
pub fn init_logging() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // 他のサブスクライバーが既に登録済みでもパニックしない
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer(std::io::stdout))
            .try_init();
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// 出力をメモリに溜めるライター
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn lines(&self) -> Vec<Value> {
            let buffer = self.0.lock().unwrap();
            String::from_utf8_lossy(&buffer)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    // フィールドがトップレベルに展開された1行JSONになる
    #[test]
    fn test_json_layer_flattens_event_fields() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::registry().with(json_layer(logs.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(record_id = "rec-1", status = 200, "レコードを削除");
        });

        let lines = logs.lines();
        assert_eq!(lines.len(), 1);

        let line = &lines[0];
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["message"], "レコードを削除");
        assert_eq!(line["record_id"], "rec-1");
        assert_eq!(line["status"], 200);
        assert!(line.get("fields").is_none());
        assert!(line["target"].as_str().unwrap().starts_with("picus::"));
        assert!(line["filename"].as_str().unwrap().ends_with("logging.rs"));
        assert!(line["line_number"].is_u64());
    }

    // スパン内で出力してもスパン情報は含まれない
    #[test]
    fn test_json_layer_omits_span_context() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::registry().with(json_layer(logs.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("delete_item", record_id = "rec-123");
            let _guard = span.enter();

            tracing::warn!("削除処理中");
        });

        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "WARN");
        assert!(lines[0].get("span").is_none());
        assert!(lines[0].get("spans").is_none());
    }

    // 本番用初期化は複数回呼び出してもグローバルサブスクライバーを登録済みにする
    #[test]
    fn test_init_logging_can_be_called_twice() {
        init_logging();
        init_logging();

        assert!(tracing::dispatcher::has_been_set());
    }
}
