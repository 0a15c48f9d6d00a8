mod object_storage;

pub use object_storage::{ObjectBody, ObjectContent, ObjectStorageClient};
