mod bucket_name;
mod namespace;
mod object_key;

pub use bucket_name::BucketName;
pub use namespace::{CompartmentId, Namespace};
pub use object_key::ObjectKey;
