/// DynamoDBでPicusレコードを管理するためのレコードリポジトリ
///
/// 作成・ID取得・全件取得・削除の4操作のみを提供する。
use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Record, RecordPayload};

/// DynamoDBアイテム表現
pub type Item = HashMap<String, AttributeValue>;

/// パーティションキー属性名
const ID_ATTRIBUTE: &str = "id";

/// レコードリポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordRepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// データのシリアライズ/デシリアライズに失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// レコード永続化用トレイト
///
/// 実際のDynamoDB実装とテスト用モックを差し替えられるように抽象化する。
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// 新しいIDと作成日時を付与してペイロードを保存
    ///
    /// # 戻り値
    /// * 成功時は生成されたレコードID
    /// * 失敗時は`Err(RecordRepositoryError)`
    async fn create(&self, payload: RecordPayload) -> Result<String, RecordRepositoryError>;

    /// IDでレコードを取得
    ///
    /// # 戻り値
    /// * 見つかった場合は`Ok(Some(Record))`
    /// * 見つからなかった場合は`Ok(None)`
    /// * 失敗時は`Err(RecordRepositoryError)`
    async fn get_by_id(&self, id: &str) -> Result<Option<Record>, RecordRepositoryError>;

    /// テーブル内の全レコードを取得（順序はストア依存）
    async fn list_all(&self) -> Result<Vec<Record>, RecordRepositoryError>;

    /// IDでレコードを削除
    ///
    /// 存在しないIDの削除も`Ok(())`を返す。
    async fn delete_by_id(&self, id: &str) -> Result<(), RecordRepositoryError>;
}

/// RecordRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoRecordRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// レコードテーブル名
    table_name: String,
    /// 全件取得で返す最大件数
    scan_limit: usize,
}

impl DynamoRecordRepository {
    /// 新しいDynamoRecordRepositoryを作成
    ///
    /// # 引数
    /// * `client` - DynamoDBクライアント
    /// * `table_name` - レコードテーブルの名前
    /// * `scan_limit` - `list_all`で返す最大件数
    pub fn new(client: DynamoDbClient, table_name: String, scan_limit: usize) -> Self {
        Self {
            client,
            table_name,
            scan_limit,
        }
    }

    /// テーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// DynamoDB上のレコード表現
///
/// ペイロードはN属性に展開せず、JSON文字列（S）のまま保存する。
/// N属性では`1.0`が`1`として読み戻され、38桁を超える数値は書き込めない。
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    id: String,
    payload: String,
    created_at: DateTime<Utc>,
}

/// レコードをDynamoDBアイテムに変換
///
/// id・payload（JSON文字列）・created_at（RFC 3339）をすべてS属性で保存する。
pub fn record_to_item(record: &Record) -> Result<Item, RecordRepositoryError> {
    let payload = serde_json::to_string(&record.payload)
        .map_err(|e| RecordRepositoryError::SerializationError(e.to_string()))?;

    let stored = StoredRecord {
        id: record.id.clone(),
        payload,
        created_at: record.created_at,
    };

    serde_dynamo::to_item(stored).map_err(|e| RecordRepositoryError::SerializationError(e.to_string()))
}

/// DynamoDBアイテムをレコードに変換
pub fn record_from_item(item: Item) -> Result<Record, RecordRepositoryError> {
    let stored: StoredRecord = serde_dynamo::from_item(item)
        .map_err(|e| RecordRepositoryError::SerializationError(e.to_string()))?;

    let payload: RecordPayload = serde_json::from_str(&stored.payload)
        .map_err(|e| RecordRepositoryError::SerializationError(e.to_string()))?;

    Ok(Record::with_id(stored.id, payload, stored.created_at))
}

/// Scan 1ページ分の結果
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    /// このページのアイテム
    pub items: Vec<Item>,
    /// 続きのページの開始キー（空または`None`なら最終ページ）
    pub last_evaluated_key: Option<Item>,
}

/// Scanのページを順に取得し、上限件数までレコードを集める
///
/// `fetch_page`には前ページの`LastEvaluatedKey`（初回は`None`）が渡される。
/// 上限に達した時点でページ途中でも打ち切り、以降のページは取得しない。
pub async fn collect_scan_pages<F, Fut>(
    scan_limit: usize,
    mut fetch_page: F,
) -> Result<Vec<Record>, RecordRepositoryError>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: Future<Output = Result<ScanPage, RecordRepositoryError>>,
{
    let mut records = Vec::new();
    let mut exclusive_start_key: Option<Item> = None;

    loop {
        let page = fetch_page(exclusive_start_key.take()).await?;

        for item in page.items {
            records.push(record_from_item(item)?);

            if records.len() >= scan_limit {
                tracing::warn!(scan_limit, "全件取得が上限件数に達したため打ち切り");
                return Ok(records);
            }
        }

        // 続きのページがなければ終了
        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
            _ => break,
        }
    }

    Ok(records)
}

#[async_trait]
impl RecordRepository for DynamoRecordRepository {
    async fn create(&self, payload: RecordPayload) -> Result<String, RecordRepositoryError> {
        let record = Record::new(payload);
        let item = record_to_item(&record)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| RecordRepositoryError::WriteError(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(record_id = %record.id, table = %self.table_name, "レコードを保存");

        Ok(record.id)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Record>, RecordRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID_ATTRIBUTE, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| RecordRepositoryError::ReadError(DisplayErrorContext(&e).to_string()))?;

        result.item.map(record_from_item).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Record>, RecordRepositoryError> {
        collect_scan_pages(self.scan_limit, |exclusive_start_key| {
            let request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(exclusive_start_key);

            async move {
                let output = request.send().await.map_err(|e| {
                    RecordRepositoryError::ReadError(DisplayErrorContext(&e).to_string())
                })?;

                Ok(ScanPage {
                    items: output.items.unwrap_or_default(),
                    last_evaluated_key: output.last_evaluated_key,
                })
            }
        })
        .await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RecordRepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID_ATTRIBUTE, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| RecordRepositoryError::WriteError(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
