//! Infrastructure layer - database and cache.

mod cache;
mod db;
pub mod migrations;

pub use cache::{RedisUserCache, UserCache};
#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockUserCache;
pub use db::Database;
pub use migrations::Migrator;
