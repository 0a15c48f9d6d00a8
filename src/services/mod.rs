mod crud_walkthrough;
pub mod local_files;

pub use crud_walkthrough::{
    example_payload, CleanupOutcome, CrudWalkthrough, WalkthroughOptions, DEFAULT_BUCKET_NAME,
    DEFAULT_DATA_OBJECT_NAME, DEFAULT_FILE_OBJECT_NAME, DOWNLOAD_CHUNK_SIZE, PAUSE_MESSAGE,
};
