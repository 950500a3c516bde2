//! Domain layer - Core business logic and entities

pub mod cache;
pub mod customer;
pub mod error;

pub use cache::{Cache, CacheExt, Expiration};
pub use customer::{
    Customer, CustomerFilter, CustomerId, CustomerRepository, CustomerStore,
    CustomerValidationError, Outcome,
};
pub use error::DomainError;
