// アプリケーション層モジュール
pub mod delete_handler;

// 再エクスポート
pub use delete_handler::{alb_response, DeleteHandler};
