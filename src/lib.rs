//! Northwind Customers
//!
//! A CRUD REST service over Northwind customer records with:
//! - A cache-aside repository keeping single-record reads in memory
//! - Sliding expiration of cached customers
//! - PostgreSQL or in-memory storage backends

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::{StorageBackend, StorageConfig};
use domain::{
    Cache, Customer, CustomerId, CustomerRepository, CustomerStore, CustomerValidationError,
    Expiration,
};
use infrastructure::{
    cache::{InMemoryCache, InMemoryCacheConfig},
    customer::{
        CachedCustomerRepository, InMemoryCustomerStore, PostgresConfig, PostgresCustomerStore,
    },
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Storage backend: {:?}", config.storage.backend);

    let store: Arc<dyn CustomerStore> = match config.storage.backend {
        StorageBackend::Memory => create_in_memory_store(&config.storage)?,
        StorageBackend::Postgres => create_postgres_store(&config.storage).await?,
    };

    let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::with_config(
        InMemoryCacheConfig::default().with_max_capacity(config.cache.max_capacity),
    ));

    let expiration = Expiration::Sliding(config.cache.sliding_expiration());
    info!(
        max_capacity = config.cache.max_capacity,
        sliding_expiration_secs = expiration.duration().as_secs(),
        "Customer cache initialized"
    );

    let customers: Arc<dyn CustomerRepository> = Arc::new(
        CachedCustomerRepository::new(store.clone(), cache.clone()).with_expiration(expiration),
    );

    Ok(AppState::new(customers, store, cache))
}

fn create_in_memory_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn CustomerStore>> {
    info!("Using in-memory customer store");

    if !config.seed_sample_data {
        return Ok(Arc::new(InMemoryCustomerStore::new()));
    }

    let customers = default_customers()?;
    info!(count = customers.len(), "Seeded sample customers");

    Ok(Arc::new(InMemoryCustomerStore::with_customers(customers)))
}

async fn create_postgres_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn CustomerStore>> {
    let url = config.resolve_database_url().ok_or_else(|| {
        anyhow::anyhow!("storage.database_url or DATABASE_URL is required for the postgres backend")
    })?;

    info!("Connecting to PostgreSQL...");
    let pg_config = PostgresConfig::new(url)
        .with_max_connections(config.max_connections)
        .with_min_connections(config.min_connections)
        .with_connect_timeout(config.connect_timeout_secs);

    let store = PostgresCustomerStore::connect(&pg_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
    info!("PostgreSQL connection established");

    if config.ensure_schema {
        store
            .ensure_schema()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to prepare customers table: {}", e))?;
    }

    Ok(Arc::new(store))
}

/// A handful of customers from the Northwind sample database
fn default_customers() -> Result<Vec<Customer>, CustomerValidationError> {
    let mut anatr = Customer::new(CustomerId::new("ANATR")?, "Ana Trujillo Emparedados y helados")
        .with_contact("Ana Trujillo", "Owner")
        .with_address("Avda. de la Constitución 2222", "México D.F.", "05021")
        .with_country("Mexico")
        .with_phone("(5) 555-4729");
    anatr.fax = Some("(5) 555-3745".to_string());

    let mut arout = Customer::new(CustomerId::new("AROUT")?, "Around the Horn")
        .with_contact("Thomas Hardy", "Sales Representative")
        .with_address("120 Hanover Sq.", "London", "WA1 1DP")
        .with_country("UK")
        .with_phone("(171) 555-7788");
    arout.fax = Some("(171) 555-6750".to_string());

    let mut bottm = Customer::new(CustomerId::new("BOTTM")?, "Bottom-Dollar Markets")
        .with_contact("Elizabeth Lincoln", "Accounting Manager")
        .with_address("23 Tsawassen Blvd.", "Tsawassen", "T2F 8M4")
        .with_country("Canada")
        .with_phone("(604) 555-4729");
    bottm.region = Some("BC".to_string());

    let mut alfki = Customer::new(CustomerId::new("ALFKI")?, "Alfreds Futterkiste")
        .with_contact("Maria Anders", "Sales Representative")
        .with_address("Obere Str. 57", "Berlin", "12209")
        .with_country("Germany")
        .with_phone("030-0074321");
    alfki.fax = Some("030-0076545".to_string());

    Ok(vec![
        alfki,
        anatr,
        Customer::new(CustomerId::new("ANTON")?, "Antonio Moreno Taquería")
            .with_contact("Antonio Moreno", "Owner")
            .with_address("Mataderos  2312", "México D.F.", "05023")
            .with_country("Mexico")
            .with_phone("(5) 555-3932"),
        arout,
        Customer::new(CustomerId::new("BERGS")?, "Berglunds snabbköp")
            .with_contact("Christina Berglund", "Order Administrator")
            .with_address("Berguvsvägen  8", "Luleå", "S-958 22")
            .with_country("Sweden")
            .with_phone("0921-12 34 65"),
        Customer::new(CustomerId::new("BLAUS")?, "Blauer See Delikatessen")
            .with_contact("Hanna Moos", "Sales Representative")
            .with_address("Forsterstr. 57", "Mannheim", "68306")
            .with_country("Germany")
            .with_phone("0621-08460"),
        Customer::new(CustomerId::new("BLONP")?, "Blondesddsl père et fils")
            .with_contact("Frédérique Citeaux", "Marketing Manager")
            .with_address("24, place Kléber", "Strasbourg", "67000")
            .with_country("France")
            .with_phone("88.60.15.31"),
        Customer::new(CustomerId::new("BOLID")?, "Bólido Comidas preparadas")
            .with_contact("Martín Sommer", "Owner")
            .with_address("C/ Araquil, 67", "Madrid", "28023")
            .with_country("Spain")
            .with_phone("(91) 555 22 82"),
        Customer::new(CustomerId::new("BONAP")?, "Bon app'")
            .with_contact("Laurence Lebihan", "Owner")
            .with_address("12, rue des Bouchers", "Marseille", "13008")
            .with_country("France")
            .with_phone("91.24.45.40"),
        bottm,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CustomerFilter;

    #[test]
    fn test_default_customers_are_valid() {
        let customers = default_customers().unwrap();

        assert_eq!(customers.len(), 10);
        for customer in &customers {
            assert!(customer.validate().is_ok(), "{} is invalid", customer.customer_id);
        }
    }

    #[tokio::test]
    async fn test_default_state_serves_sample_data() {
        let state = create_app_state().await.unwrap();

        let alfki = state
            .customers
            .retrieve(&CustomerId::new("alfki").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alfki.company_name, "Alfreds Futterkiste");

        let french = state
            .customers
            .retrieve_all(&CustomerFilter::by_country("France"))
            .await
            .unwrap();
        assert_eq!(french.len(), 2);
    }

    #[tokio::test]
    async fn test_state_without_seed_is_empty() {
        let mut config = AppConfig::default();
        config.storage.seed_sample_data = false;

        let state = create_app_state_with_config(&config).await.unwrap();
        let all = state
            .customers
            .retrieve_all(&CustomerFilter::all())
            .await
            .unwrap();

        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_postgres_backend_requires_url() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Postgres;
        config.storage.database_url = None;

        // Only meaningful when the environment does not provide a URL
        if std::env::var("DATABASE_URL").is_err() {
            assert!(create_app_state_with_config(&config).await.is_err());
        }
    }
}
