/// テスト用のインメモリRecordRepository
///
/// `picus`自身のユニットテストと、`test-util`フィーチャー経由で
/// 他クレートの統合テストから共通で利用する。
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{Record, RecordPayload};
use crate::infrastructure::{RecordRepository, RecordRepositoryError};

/// モックRecordRepository
///
/// クローン同士で同じストアを共有するため、ハンドラーに渡した後も
/// テスト側から状態を確認できる。
#[derive(Debug, Clone, Default)]
pub struct MockRecordRepository {
    /// 保存されたレコード: id -> Record
    records: Arc<Mutex<HashMap<String, Record>>>,
    /// 次の操作で返すエラー（エラーパスのテスト用）
    next_error: Arc<Mutex<Option<RecordRepositoryError>>>,
}

impl MockRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 次の1操作だけ指定のエラーを返す
    pub fn set_next_error(&self, error: RecordRepositoryError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    pub fn insert(&self, record: Record) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    pub fn remove(&self, id: &str) {
        self.records.lock().unwrap().remove(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.lock().unwrap().contains_key(id)
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn take_error(&self) -> Option<RecordRepositoryError> {
        self.next_error.lock().unwrap().take()
    }
}

#[async_trait]
impl RecordRepository for MockRecordRepository {
    async fn create(&self, payload: RecordPayload) -> Result<String, RecordRepositoryError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }

        let record = Record::new(payload);
        let id = record.id.clone();
        self.insert(record);
        Ok(id)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Record>, RecordRepositoryError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }

        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Record>, RecordRepositoryError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }

        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RecordRepositoryError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }

        self.remove(id);
        Ok(())
    }
}
