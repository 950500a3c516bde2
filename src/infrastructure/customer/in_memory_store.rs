//! In-memory customer store

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::customer::{Customer, CustomerFilter, CustomerId, CustomerStore};
use crate::domain::DomainError;

/// Thread-safe in-memory customer store
///
/// Useful for testing and development. Data is lost when the process
/// terminates. Writes report affected rows the way a table would.
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    customers: RwLock<BTreeMap<CustomerId, Customer>>,
}

impl InMemoryCustomerStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with customers
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let map = customers
            .into_iter()
            .map(|c| (c.customer_id.clone(), c))
            .collect();

        Self {
            customers: RwLock::new(map),
        }
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn find(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(customers.get(id).cloned())
    }

    async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        let customers = self.customers.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(customers
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn insert(&self, customer: &Customer) -> Result<u64, DomainError> {
        let mut customers = self.customers.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if customers.contains_key(&customer.customer_id) {
            return Ok(0);
        }

        customers.insert(customer.customer_id.clone(), customer.clone());
        Ok(1)
    }

    async fn update(&self, customer: &Customer) -> Result<u64, DomainError> {
        let mut customers = self.customers.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match customers.get_mut(&customer.customer_id) {
            Some(existing) => {
                *existing = customer.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &CustomerId) -> Result<u64, DomainError> {
        let mut customers = self.customers.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(customers.remove(id).map_or(0, |_| 1))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, country: &str) -> Customer {
        Customer::new(CustomerId::new(id).unwrap(), format!("{} Ltd", id)).with_country(country)
    }

    fn id(raw: &str) -> CustomerId {
        CustomerId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryCustomerStore::new();

        assert_eq!(store.insert(&customer("ALFKI", "Germany")).await.unwrap(), 1);

        let found = store.find(&id("alfki")).await.unwrap().unwrap();
        assert_eq!(found.customer_id.as_str(), "ALFKI");
        assert_eq!(found.country.as_deref(), Some("Germany"));
    }

    #[tokio::test]
    async fn test_insert_duplicate_affects_no_rows() {
        let store = InMemoryCustomerStore::with_customers(vec![customer("ALFKI", "Germany")]);

        assert_eq!(store.insert(&customer("ALFKI", "France")).await.unwrap(), 0);

        let found = store.find(&id("ALFKI")).await.unwrap().unwrap();
        assert_eq!(found.country.as_deref(), Some("Germany"));
    }

    #[tokio::test]
    async fn test_update() {
        let store = InMemoryCustomerStore::with_customers(vec![customer("ALFKI", "Germany")]);

        assert_eq!(store.update(&customer("ALFKI", "France")).await.unwrap(), 1);
        assert_eq!(store.update(&customer("ZZZZ", "France")).await.unwrap(), 0);

        let found = store.find(&id("ALFKI")).await.unwrap().unwrap();
        assert_eq!(found.country.as_deref(), Some("France"));
        assert!(store.find(&id("ZZZZ")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryCustomerStore::with_customers(vec![customer("ALFKI", "Germany")]);

        assert_eq!(store.delete(&id("ALFKI")).await.unwrap(), 1);
        assert_eq!(store.delete(&id("ALFKI")).await.unwrap(), 0);
        assert!(store.find(&id("ALFKI")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_filtered() {
        let store = InMemoryCustomerStore::with_customers(vec![
            customer("FOLKO", "Sweden"),
            customer("BLONP", "France"),
            customer("ALFKI", "Germany"),
            customer("BONAP", "France"),
        ]);

        let all = store.list(&CustomerFilter::all()).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|c| c.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["ALFKI", "BLONP", "BONAP", "FOLKO"]);

        let french = store.list(&CustomerFilter::by_country("France")).await.unwrap();
        assert_eq!(french.len(), 2);

        let none = store.list(&CustomerFilter::by_country("Spain")).await.unwrap();
        assert!(none.is_empty());
    }
}
