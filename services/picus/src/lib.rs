// Domain layer modules
pub mod domain;

// Application layer modules
pub mod application;

// Infrastructure layer modules
pub mod infrastructure;

// Test helpers (enabled for unit tests and the `test-util` feature)
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
