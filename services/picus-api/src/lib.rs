//! Picusレコード用HTTP APIサーバー
//!
//! 任意のJSONオブジェクトをDynamoDBに保存し、ID指定取得・全件一覧を提供する。
//! 削除はALB経由の削除Lambda（`picus`クレートの`delete_item`）が担当する。

mod error;
mod routes;

pub use error::{ApiError, ApiErrorBody};
pub use routes::{
    create_router, AppState, GetRecordResponse, HealthResponse, ListRecordsResponse,
    PutRecordResponse,
};
