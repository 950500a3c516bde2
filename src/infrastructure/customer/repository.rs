//! Cache-aside customer repository

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::cache::{Cache, CacheExt, Expiration};
use crate::domain::customer::{
    Customer, CustomerFilter, CustomerId, CustomerRepository, CustomerStore, Outcome,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_cache_lookup, record_store_write};

/// Default sliding expiration for cached customers
pub const DEFAULT_SLIDING_EXPIRATION: Duration = Duration::from_secs(30 * 60);

const CACHE_NAMESPACE: &str = "customer";

/// Cache key for a single customer
pub fn customer_cache_key(id: &CustomerId) -> String {
    format!("{}:{}", CACHE_NAMESPACE, id.as_str())
}

/// Customer repository keeping a read cache in front of the store
///
/// Single-record reads go through the cache; listings always hit the store.
/// Successful writes refresh the cache, successful deletes evict from it.
/// A cache hit is trusted for as long as the entry lives.
#[derive(Debug, Clone)]
pub struct CachedCustomerRepository {
    store: Arc<dyn CustomerStore>,
    cache: Arc<dyn Cache>,
    expiration: Expiration,
}

impl CachedCustomerRepository {
    /// Creates a repository with the default 30 minute sliding expiration
    pub fn new(store: Arc<dyn CustomerStore>, cache: Arc<dyn Cache>) -> Self {
        Self {
            store,
            cache,
            expiration: Expiration::Sliding(DEFAULT_SLIDING_EXPIRATION),
        }
    }

    /// Overrides the expiration applied to cached customers
    pub fn with_expiration(mut self, expiration: Expiration) -> Self {
        self.expiration = expiration;
        self
    }

    async fn cache_customer(&self, customer: &Customer) -> Result<(), DomainError> {
        let key = customer_cache_key(&customer.customer_id);
        self.cache.set(&key, customer, self.expiration).await
    }
}

#[async_trait]
impl CustomerRepository for CachedCustomerRepository {
    async fn create(&self, customer: Customer) -> Result<Outcome<Customer>, DomainError> {
        let affected = self.store.insert(&customer).await?;
        record_store_write("create", affected == 1);

        if affected != 1 {
            warn!(customer_id = %customer.customer_id, affected, "Customer insert did not take effect");
            return Ok(Outcome::WriteFailed);
        }

        self.cache_customer(&customer).await?;
        debug!(customer_id = %customer.customer_id, "Customer created and cached");

        Ok(Outcome::Success(customer))
    }

    async fn retrieve(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        let key = customer_cache_key(id);

        if let Some(cached) = self.cache.get::<Customer>(&key).await? {
            record_cache_lookup(true);
            debug!(customer_id = %id, "Customer cache hit");
            return Ok(Some(cached));
        }

        record_cache_lookup(false);
        debug!(customer_id = %id, "Customer cache miss");

        let Some(customer) = self.store.find(id).await? else {
            return Ok(None);
        };

        self.cache_customer(&customer).await?;

        Ok(Some(customer))
    }

    async fn retrieve_all(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        self.store.list(filter).await
    }

    async fn update(&self, customer: Customer) -> Result<Outcome<Customer>, DomainError> {
        let affected = self.store.update(&customer).await?;
        record_store_write("update", affected == 1);

        if affected != 1 {
            warn!(customer_id = %customer.customer_id, affected, "Customer update did not take effect");
            return Ok(Outcome::WriteFailed);
        }

        self.cache_customer(&customer).await?;
        debug!(customer_id = %customer.customer_id, "Customer updated and cache refreshed");

        Ok(Outcome::Success(customer))
    }

    async fn delete(&self, id: &CustomerId) -> Result<Outcome<()>, DomainError> {
        if self.store.find(id).await?.is_none() {
            return Ok(Outcome::NotFound);
        }

        let affected = self.store.delete(id).await?;
        record_store_write("delete", affected == 1);

        if affected != 1 {
            warn!(customer_id = %id, affected, "Customer delete did not take effect");
            return Ok(Outcome::WriteFailed);
        }

        self.cache.delete(&customer_cache_key(id)).await?;
        debug!(customer_id = %id, "Customer deleted and evicted from cache");

        Ok(Outcome::Success(()))
    }
}
