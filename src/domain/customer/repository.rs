//! Customer store and repository traits

use std::fmt::Debug;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{Customer, CustomerId};
use crate::domain::DomainError;

/// Result of a repository operation that can legitimately not happen
///
/// Faults (lost connections, broken cache) travel as `Err(DomainError)`;
/// this type only carries the expected business outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation took effect
    Success(T),
    /// No record exists for the requested identifier
    NotFound,
    /// The record was addressed but the store reported an unexpected
    /// affected-row count
    WriteFailed,
}

/// Filter for listing customers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    /// Exact, case-sensitive match on the country column
    pub country: Option<String>,
}

impl CustomerFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a country; an empty string means no filter
    pub fn by_country(country: impl Into<String>) -> Self {
        let country = country.into();

        Self {
            country: (!country.is_empty()).then_some(country),
        }
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        match &self.country {
            Some(country) => customer.country.as_deref() == Some(country.as_str()),
            None => true,
        }
    }
}

/// Persistent customer records
///
/// Write methods report the number of affected rows rather than failing when
/// nothing changed; callers decide what a count other than one means.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CustomerStore: Send + Sync + Debug {
    /// First record matching the identifier
    async fn find(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError>;

    /// All records matching the filter, ordered by identifier
    async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError>;

    /// Insert a new record; an existing identifier affects zero rows
    async fn insert(&self, customer: &Customer) -> Result<u64, DomainError>;

    /// Overwrite every column of an existing record
    async fn update(&self, customer: &Customer) -> Result<u64, DomainError>;

    async fn delete(&self, id: &CustomerId) -> Result<u64, DomainError>;

    /// Check connectivity
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Customer operations consumed by the HTTP layer
#[async_trait]
pub trait CustomerRepository: Send + Sync + Debug {
    /// Insert a customer; `WriteFailed` when the store did not take it
    async fn create(&self, customer: Customer) -> Result<Outcome<Customer>, DomainError>;

    /// Look up a single customer, cache first
    async fn retrieve(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError>;

    /// List customers straight from the store
    async fn retrieve_all(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError>;

    /// Replace a customer; `WriteFailed` when the store did not take it
    async fn update(&self, customer: Customer) -> Result<Outcome<Customer>, DomainError>;

    /// Remove a customer; `NotFound` and `WriteFailed` are distinct
    async fn delete(&self, id: &CustomerId) -> Result<Outcome<()>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, country: Option<&str>) -> Customer {
        let mut c = Customer::new(CustomerId::new(id).unwrap(), "Company");
        c.country = country.map(String::from);
        c
    }

    #[test]
    fn test_filter_matches_country_exactly() {
        let filter = CustomerFilter::by_country("France");

        assert!(filter.matches(&customer("BLONP", Some("France"))));
        assert!(!filter.matches(&customer("ALFKI", Some("Germany"))));
        assert!(!filter.matches(&customer("XXXXX", Some("france"))));
        assert!(!filter.matches(&customer("NOCTY", None)));
    }

    #[test]
    fn test_empty_country_means_no_filter() {
        assert_eq!(CustomerFilter::by_country(""), CustomerFilter::all());
        assert!(CustomerFilter::all().matches(&customer("NOCTY", None)));
    }
}
