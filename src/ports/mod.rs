pub mod prompt;
pub mod storage;

// Re-export all port traits for convenience
pub use prompt::{NoPause, OperatorPrompt};
pub use storage::{ObjectBody, ObjectContent, ObjectStorageClient};
