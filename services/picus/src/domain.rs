// Domain layer modules
pub mod delete_target;
pub mod record;

// Re-exports
pub use delete_target::{extract_record_id, DeleteTargetError, COLLECTION_NAME};
pub use record::{Record, RecordPayload};
