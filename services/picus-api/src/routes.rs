//! /picus 配下のエンドポイント
//!
//! - ヘルスチェック (GET /picus/health)
//! - レコードの保存 (POST /picus/put)
//! - レコードの取得 (GET /picus/get/{id})
//! - レコードの一覧 (GET /picus/list)

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use picus::domain::{Record, RecordPayload};
use picus::infrastructure::RecordRepository;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

/// アプリケーション状態
///
/// 起動時に構築したリポジトリをすべてのハンドラーで共有する。
#[derive(Clone)]
pub struct AppState {
    /// レコードリポジトリ
    pub repository: Arc<dyn RecordRepository>,
}

/// ヘルスチェックのレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// POST /picus/put のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PutRecordResponse {
    /// 生成されたレコードID
    pub id: String,
}

/// GET /picus/get/{id} のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetRecordResponse {
    pub item: Record,
}

/// GET /picus/list のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListRecordsResponse {
    pub items: Vec<Record>,
}

/// ヘルスチェックエンドポイント
///
/// ストアには触れず、常に固定のレスポンスを返す。
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Picus API is alive".to_string(),
    })
}

/// レコード保存エンドポイント (POST /picus/put)
///
/// リクエストボディのJSONオブジェクトをスキーマ検証なしでそのまま保存する。
///
/// # Returns
/// - 200 OK: `{"id": "<uuid>"}`
/// - 400 / 415 / 422: ボディがJSONオブジェクトとして解釈できない
/// - 500 Internal Server Error: DynamoDBエラー
async fn put_record(
    State(state): State<AppState>,
    payload: Result<Json<RecordPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "リクエストボディが不正");
            return ApiError::new(rejection.status(), "bad_request", rejection.body_text())
                .into_response();
        }
    };

    tracing::info!(field_count = payload.len(), "レコード保存リクエストを受信");

    match state.repository.create(payload).await {
        Ok(id) => {
            tracing::info!(record_id = %id, "レコードを作成");
            Json(PutRecordResponse { id }).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "レコード保存エラー");
            ApiError::from(e).into_response()
        }
    }
}

/// レコード取得エンドポイント (GET /picus/get/{id})
///
/// # Returns
/// - 200 OK: `{"item": {...}}`
/// - 404 Not Found: レコードが存在しない
/// - 500 Internal Server Error: DynamoDBエラー
async fn get_record(State(state): State<AppState>, Path(record_id): Path<String>) -> Response {
    match state.repository.get_by_id(&record_id).await {
        Ok(Some(item)) => Json(GetRecordResponse { item }).into_response(),
        Ok(None) => {
            tracing::info!(record_id = %record_id, "レコードが見つからない");
            ApiError::not_found("Item not found").into_response()
        }
        Err(e) => {
            tracing::error!(record_id = %record_id, error = %e, "レコード取得エラー");
            ApiError::from(e).into_response()
        }
    }
}

/// レコード一覧エンドポイント (GET /picus/list)
async fn list_records(State(state): State<AppState>) -> Response {
    match state.repository.list_all().await {
        Ok(items) => {
            tracing::info!(count = items.len(), "一覧を返却");
            Json(ListRecordsResponse { items }).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "レコード一覧取得エラー");
            ApiError::from(e).into_response()
        }
    }
}

/// ルーターを構築する
///
/// 全エンドポイントを`/picus`配下にマウントし、
/// TraceLayerでリクエスト/レスポンスの構造化ログを記録する。
///
/// # Arguments
/// * `repository` - レコードリポジトリ（DynamoDB実装またはテスト用モック）
pub fn create_router(repository: Arc<dyn RecordRepository>) -> Router {
    let state = AppState { repository };

    let routes = Router::new()
        .route("/health", get(health))
        .route("/put", post(put_record))
        .route("/get/{id}", get(get_record))
        .route("/list", get(list_records));

    Router::new()
        .nest("/picus", routes)
        // リクエストトレーシングレイヤー（method, path, status, latencyを自動記録）
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
