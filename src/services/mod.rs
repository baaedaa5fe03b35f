pub mod cache;
pub mod rate_limit;

pub use cache::{FetchCache, ReadingSet};
