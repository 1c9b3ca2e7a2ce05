//! ECS上で動作するPicusレコードAPIサーバー

use std::sync::Arc;

use picus::infrastructure::config::{bind_addr_from_env, load_dotenv};
use picus::infrastructure::{init_logging, DynamoDbConfig, DynamoRecordRepository, TableConfig};
use picus_api::create_router;
use tokio::signal;

/// シャットダウンシグナルを待機する
///
/// SIGTERM（ECSタスク停止時）またはCtrl+C (SIGINT) を受信したらリターンする。
///
/// # Panics
/// シグナルハンドラーの登録に失敗した場合はパニックする。
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Ctrl+C シグナルハンドラーの登録に失敗しました");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM シグナルハンドラーの登録に失敗しました")
            .recv()
            .await;
    };

    // Windows等の非Unix環境ではSIGTERMは利用不可
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C (SIGINT) を受信しました。graceful shutdownを開始します");
        }
        _ = terminate => {
            tracing::info!("SIGTERM を受信しました。graceful shutdownを開始します");
        }
    }
}

/// メイン関数
///
/// # 環境変数（`.env`ファイルがあれば未設定分を補う）
/// - `AWS_REGION`: リージョン（デフォルト: eu-central-1）
/// - `DYNAMODB_TABLE`: テーブル名（デフォルト: picus）
/// - `DYNAMODB_ENDPOINT_URL`: エンドポイント上書き（任意）
/// - `LIST_SCAN_LIMIT`: 一覧取得の上限件数（デフォルト: 1000）
/// - `BIND_ADDR`: リッスンアドレス（デフォルト: 0.0.0.0:8080）
/// - `RUST_LOG`: ログレベル（デフォルト: info）
#[tokio::main]
async fn main() {
    // ローカル開発時は.envの値も環境変数として扱う
    let dotenv_loaded = load_dotenv();
    init_logging();

    tracing::info!(dotenv_loaded, "Picus API サーバーを起動します");

    let table_config = TableConfig::from_env();
    let config = DynamoDbConfig::from_table_config(&table_config).await;
    tracing::info!(
        region = %table_config.region,
        table = config.table_name(),
        scan_limit = config.scan_limit(),
        "DynamoDB設定を読み込みました"
    );

    let repository = Arc::new(DynamoRecordRepository::new(
        config.client().clone(),
        config.table_name().to_string(),
        config.scan_limit(),
    ));

    let app = create_router(repository);

    let addr = bind_addr_from_env().unwrap_or_else(|e| panic!("リッスンアドレスが不正です: {}", e));
    tracing::info!("リッスン開始: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("アドレスのバインドに失敗しました");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("サーバーの起動に失敗しました");

    tracing::info!("サーバーが正常に停止しました");
}
