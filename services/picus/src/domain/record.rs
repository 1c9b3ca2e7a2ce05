/// Picusレコード
///
/// テーブルに保存される唯一のエンティティ。
/// ペイロードはスキーマを持たないJSONオブジェクトで、保存時のまま返却する。
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// レコードのペイロード（任意のJSONオブジェクト）
pub type RecordPayload = Map<String, Value>;

/// 保存済みレコード
///
/// `id`と`created_at`は作成時に一度だけ決まり、以後変更されない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// ランダム生成されたレコードID（UUID v4）
    pub id: String,
    /// 呼び出し元から受け取ったJSONオブジェクト
    pub payload: RecordPayload,
    /// 作成日時（UTC、RFC 3339）
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// 新しいIDと現在時刻でレコードを作成
    pub fn new(payload: RecordPayload) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), payload, Utc::now())
    }

    /// 明示的な値でレコードを作成（テスト・復元用）
    pub fn with_id(id: impl Into<String>, payload: RecordPayload, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            payload,
            created_at,
        }
    }
}
