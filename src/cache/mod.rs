// Cache module for local filesystem caching.
// Stores API responses and liked events between runs.

pub mod likes;
pub mod paths;
pub mod store;

pub use likes::LikedEvents;
pub use store::LocalStore;
