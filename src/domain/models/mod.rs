pub mod bucket;
pub mod object;
pub mod report;

pub use bucket::*;
pub use object::*;
pub use report::*;
