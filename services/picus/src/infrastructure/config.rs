/// DynamoDB接続設定
///
/// 環境変数からリージョン・テーブル名などを読み込む。
/// いずれの値も未設定時はデフォルト値で動作する。
use std::net::SocketAddr;
use std::path::Path;

use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

/// リージョン環境変数名
pub const AWS_REGION_ENV: &str = "AWS_REGION";
/// APIサーバー用テーブル名環境変数名
pub const DYNAMODB_TABLE_ENV: &str = "DYNAMODB_TABLE";
/// 削除Lambda用テーブル名環境変数名
pub const TABLE_NAME_ENV: &str = "TABLE_NAME";
/// DynamoDBエンドポイント上書き用環境変数名（DynamoDB Local等）
pub const DYNAMODB_ENDPOINT_URL_ENV: &str = "DYNAMODB_ENDPOINT_URL";
/// 一覧取得の上限件数環境変数名
pub const LIST_SCAN_LIMIT_ENV: &str = "LIST_SCAN_LIMIT";
/// APIサーバーのリッスンアドレス環境変数名
pub const BIND_ADDR_ENV: &str = "BIND_ADDR";

/// デフォルトのリージョン（フランクフルト）
pub const DEFAULT_REGION: &str = "eu-central-1";
/// デフォルトのテーブル名
pub const DEFAULT_TABLE_NAME: &str = "picus";
/// デフォルトの一覧取得上限件数
pub const DEFAULT_LIST_SCAN_LIMIT: usize = 1000;
/// デフォルトのリッスンアドレス
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// 設定読み込みのエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 環境変数の値が不正
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// テーブル設定
///
/// AWSクライアントを含まない純粋な値。
/// `DynamoDbConfig::from_table_config`でクライアント付きの設定に変換する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// AWSリージョン
    pub region: String,
    /// DynamoDBテーブル名
    pub table_name: String,
    /// エンドポイントURLの上書き（未設定時はAWS標準エンドポイント）
    pub endpoint_url: Option<String>,
    /// 一覧取得で返す最大件数
    pub scan_limit: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            endpoint_url: None,
            scan_limit: DEFAULT_LIST_SCAN_LIMIT,
        }
    }
}

impl TableConfig {
    /// APIサーバー用の設定を環境変数から読み込み
    ///
    /// 環境変数:
    /// - AWS_REGION: リージョン（デフォルト: eu-central-1）
    /// - DYNAMODB_TABLE: テーブル名（デフォルト: picus）
    /// - DYNAMODB_ENDPOINT_URL: エンドポイント上書き（任意）
    /// - LIST_SCAN_LIMIT: 一覧取得の上限件数（デフォルト: 1000）
    pub fn from_env() -> Self {
        let table_name =
            get_optional_string(DYNAMODB_TABLE_ENV).unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        Self::with_table_name(table_name)
    }

    /// 削除Lambda用の設定を環境変数から読み込み
    ///
    /// テーブル名は TABLE_NAME → DYNAMODB_TABLE → デフォルト の順に解決する。
    pub fn from_lambda_env() -> Self {
        let table_name = get_optional_string(TABLE_NAME_ENV)
            .or_else(|| get_optional_string(DYNAMODB_TABLE_ENV))
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        Self::with_table_name(table_name)
    }

    fn with_table_name(table_name: String) -> Self {
        let region =
            get_optional_string(AWS_REGION_ENV).unwrap_or_else(|| DEFAULT_REGION.to_string());
        let endpoint_url = get_optional_string(DYNAMODB_ENDPOINT_URL_ENV);
        let scan_limit = get_optional_string(LIST_SCAN_LIMIT_ENV)
            .map(|v| parse_scan_limit(&v))
            .unwrap_or(DEFAULT_LIST_SCAN_LIMIT);

        Self {
            region,
            table_name,
            endpoint_url,
            scan_limit,
        }
    }
}

/// テーブル名とクライアントを持つDynamoDB設定
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// レコードテーブル名
    table_name: String,
    /// 一覧取得の上限件数
    scan_limit: usize,
}

impl DynamoDbConfig {
    /// テーブル設定からAWS設定を読み込み、DynamoDBクライアントを作成
    ///
    /// 認証情報はaws-configの標準プロバイダチェーンで解決する。
    pub async fn from_table_config(table_config: &TableConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(table_config.region.clone()));

        if let Some(endpoint_url) = &table_config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        let aws_config = loader.load().await;

        Self {
            client: DynamoDbClient::new(&aws_config),
            table_name: table_config.table_name.clone(),
            scan_limit: table_config.scan_limit,
        }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// レコードテーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// 一覧取得の上限件数を取得
    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }
}

/// APIサーバーのリッスンアドレスを環境変数から読み込み
///
/// 未設定時は`0.0.0.0:8080`。値がソケットアドレスとして解釈できない場合はエラー。
pub fn bind_addr_from_env() -> Result<SocketAddr, ConfigError> {
    let value = get_optional_string(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    parse_bind_addr(&value)
}

/// ソケットアドレス文字列をパース
pub fn parse_bind_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: BIND_ADDR_ENV.to_string(),
        value: value.to_string(),
    })
}

/// 一覧取得の上限件数をパース（不正値・0はデフォルト値）
pub fn parse_scan_limit(value: &str) -> usize {
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => limit,
        _ => DEFAULT_LIST_SCAN_LIMIT,
    }
}

/// `.env`ファイルを環境変数に読み込む（ローカル開発用）
///
/// カレントディレクトリから親方向に`.env`を探す。既に設定済みの環境変数は上書きしない。
/// 読み込めた場合は`true`、ファイルがなければ何もせず`false`を返す。
pub fn load_dotenv() -> bool {
    report_dotenv(dotenvy::dotenv().map(|_| ()))
}

/// 指定パスの`.env`ファイルを環境変数に読み込む
pub fn load_dotenv_from(path: impl AsRef<Path>) -> bool {
    report_dotenv(dotenvy::from_path(path))
}

fn report_dotenv(result: Result<(), dotenvy::Error>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) if e.not_found() => false,
        Err(e) => {
            tracing::warn!(error = %e, ".envファイルの読み込みに失敗");
            false
        }
    }
}

/// 文字列オプションを読み込むヘルパー（空文字はNone扱い）
fn get_optional_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
