// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod record_repository;

// Re-exports
pub use config::{ConfigError, DynamoDbConfig, TableConfig};
pub use logging::init_logging;
pub use record_repository::{DynamoRecordRepository, RecordRepository, RecordRepositoryError};
