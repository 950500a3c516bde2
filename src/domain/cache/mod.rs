//! Cache domain - Generic caching abstraction layer

mod repository;

pub use repository::{Cache, CacheExt, Expiration};

#[cfg(test)]
pub use repository::mock::MockCache;
