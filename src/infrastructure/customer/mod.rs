//! Customer infrastructure
//!
//! Store implementations (PostgreSQL and in-memory) and the cache-aside
//! repository that sits in front of them.

mod in_memory_store;
mod postgres_store;
mod repository;

pub use in_memory_store::InMemoryCustomerStore;
pub use postgres_store::{PostgresConfig, PostgresCustomerStore};
pub use repository::{customer_cache_key, CachedCustomerRepository, DEFAULT_SLIDING_EXPIRATION};
