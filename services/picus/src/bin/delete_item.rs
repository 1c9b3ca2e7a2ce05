/// レコード削除Lambdaエントリポイント
///
/// ALBターゲットグループから `DELETE /picus/{id}` を受け取り、
/// DynamoDBから該当レコードを削除する。APIサーバーとは独立して起動される。
use lambda_runtime::{service_fn, Error, LambdaEvent};
use picus::application::DeleteHandler;
use picus::infrastructure::{init_logging, DynamoDbConfig, DynamoRecordRepository, TableConfig};
use serde_json::Value;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // DynamoDBクライアントはwarm start間で再利用する
    let table_config = TableConfig::from_lambda_env();
    let config = DynamoDbConfig::from_table_config(&table_config).await;
    info!(
        region = %table_config.region,
        table = config.table_name(),
        "削除Lambdaを初期化"
    );

    let repository = DynamoRecordRepository::new(
        config.client().clone(),
        config.table_name().to_string(),
        config.scan_limit(),
    );
    let delete_handler = &DeleteHandler::new(repository);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        debug!(request_id = %event.context.request_id, "削除リクエスト受信");
        Ok::<Value, Error>(delete_handler.handle(&event.payload).await)
    }))
    .await
}
