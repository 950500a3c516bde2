//! Infrastructure layer - Store, cache and observability implementations

pub mod cache;
pub mod customer;
pub mod observability;
