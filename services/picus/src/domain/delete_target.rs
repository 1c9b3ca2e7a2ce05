// 削除対象IDの抽出
//
// ALBから渡されるパス（/picus/{id}）から削除対象のレコードIDを取り出す。

use thiserror::Error;

/// コレクション名（パスのプレースホルダーとしても現れる）
pub const COLLECTION_NAME: &str = "picus";

/// 削除対象抽出のエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeleteTargetError {
    /// パスにIDが含まれていない
    #[error("Missing key in path, expected /picus/{{key}}")]
    MissingKey,
}

/// パス文字列から削除対象のレコードIDを抽出
///
/// # Arguments
/// * `path` - リクエストパス（例: `/picus/123`）
///
/// # Returns
/// * `Ok(&str)` - 末尾セグメントのレコードID
/// * `Err(DeleteTargetError::MissingKey)` - IDが空、またはコレクション名のみ
///
/// # Notes
/// - 末尾のスラッシュは事前に除去する（`/picus/123/` も `123` を指す）
/// - スラッシュを含まないパスはIDなしとして扱う
pub fn extract_record_id(path: &str) -> Result<&str, DeleteTargetError> {
    let trimmed = path.trim_end_matches('/');

    let key = match trimmed.rsplit_once('/') {
        Some((_, last)) => last,
        None => "",
    };

    if key.is_empty() || key == COLLECTION_NAME {
        return Err(DeleteTargetError::MissingKey);
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_id() {
        assert_eq!(extract_record_id("/picus/123"), Ok("123"));
    }

    #[test]
    fn test_extract_uuid_id() {
        let path = "/picus/0b7c2f0e-6f6b-4a43-9a7e-4a1f4c6d9e21";
        assert_eq!(
            extract_record_id(path),
            Ok("0b7c2f0e-6f6b-4a43-9a7e-4a1f4c6d9e21")
        );
    }

    // 末尾スラッシュは除去してから末尾セグメントを取る
    #[test]
    fn test_extract_with_trailing_slash() {
        assert_eq!(extract_record_id("/picus/123/"), Ok("123"));
        assert_eq!(extract_record_id("/picus/123//"), Ok("123"));
    }

    // 深いパスでも末尾セグメントがIDになる
    #[test]
    fn test_extract_last_segment_of_nested_path() {
        assert_eq!(extract_record_id("/api/picus/abc"), Ok("abc"));
    }

    #[test]
    fn test_collection_only_is_missing_key() {
        assert_eq!(
            extract_record_id("/picus"),
            Err(DeleteTargetError::MissingKey)
        );
    }

    #[test]
    fn test_collection_with_trailing_slash_is_missing_key() {
        assert_eq!(
            extract_record_id("/picus/"),
            Err(DeleteTargetError::MissingKey)
        );
    }

    #[test]
    fn test_empty_path_is_missing_key() {
        assert_eq!(extract_record_id(""), Err(DeleteTargetError::MissingKey));
        assert_eq!(extract_record_id("/"), Err(DeleteTargetError::MissingKey));
    }

    // スラッシュを含まないパスはIDなし扱い
    #[test]
    fn test_path_without_slash_is_missing_key() {
        assert_eq!(
            extract_record_id("123"),
            Err(DeleteTargetError::MissingKey)
        );
    }

    #[test]
    fn test_missing_key_error_display() {
        assert_eq!(
            DeleteTargetError::MissingKey.to_string(),
            "Missing key in path, expected /picus/{key}"
        );
    }
}
