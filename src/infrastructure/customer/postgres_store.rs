//! PostgreSQL customer store with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::customer::{Customer, CustomerFilter, CustomerId, CustomerStore};
use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/northwind".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

const CUSTOMER_COLUMNS: &str = "customer_id, company_name, contact_name, contact_title, \
     address, city, region, postal_code, country, phone, fax";

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    customer_id   VARCHAR(5)  PRIMARY KEY,
    company_name  VARCHAR(40) NOT NULL,
    contact_name  VARCHAR(30),
    contact_title VARCHAR(30),
    address       VARCHAR(60),
    city          VARCHAR(15),
    region        VARCHAR(15),
    postal_code   VARCHAR(10),
    country       VARCHAR(15),
    phone         VARCHAR(24),
    fax           VARCHAR(24)
)
"#;

/// Customer store backed by the Northwind `customers` table
#[derive(Debug, Clone)]
pub struct PostgresCustomerStore {
    pool: PgPool,
}

impl PostgresCustomerStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new store with its own connection pool
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Create the customers table when it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create customers table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
    async fn find(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        let sql = format!(
            "SELECT {} FROM customers WHERE customer_id = $1 LIMIT 1",
            CUSTOMER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get customer: {}", e)))?;

        row.as_ref().map(row_to_customer).transpose()
    }

    async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        let rows = match &filter.country {
            Some(country) => {
                let sql = format!(
                    "SELECT {} FROM customers WHERE country = $1 ORDER BY customer_id",
                    CUSTOMER_COLUMNS
                );

                sqlx::query(&sql)
                    .bind(country)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM customers ORDER BY customer_id",
                    CUSTOMER_COLUMNS
                );

                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list customers: {}", e)))?;

        rows.iter().map(row_to_customer).collect()
    }

    async fn insert(&self, customer: &Customer) -> Result<u64, DomainError> {
        let sql = format!(
            "INSERT INTO customers ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (customer_id) DO NOTHING",
            CUSTOMER_COLUMNS
        );

        let result = bind_customer(sqlx::query(&sql), customer)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create customer: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn update(&self, customer: &Customer) -> Result<u64, DomainError> {
        let sql = r#"
            UPDATE customers
            SET company_name = $2, contact_name = $3, contact_title = $4, address = $5,
                city = $6, region = $7, postal_code = $8, country = $9, phone = $10, fax = $11
            WHERE customer_id = $1
        "#;

        let result = bind_customer(sqlx::query(sql), customer)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update customer: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &CustomerId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete customer: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database unreachable: {}", e)))?;

        Ok(())
    }
}

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

/// Bind all columns in `CUSTOMER_COLUMNS` order
fn bind_customer<'q>(query: PgQuery<'q>, customer: &'q Customer) -> PgQuery<'q> {
    query
        .bind(customer.customer_id.as_str())
        .bind(customer.company_name.as_str())
        .bind(customer.contact_name.as_deref())
        .bind(customer.contact_title.as_deref())
        .bind(customer.address.as_deref())
        .bind(customer.city.as_deref())
        .bind(customer.region.as_deref())
        .bind(customer.postal_code.as_deref())
        .bind(customer.country.as_deref())
        .bind(customer.phone.as_deref())
        .bind(customer.fax.as_deref())
}

fn row_to_customer(row: &PgRow) -> Result<Customer, DomainError> {
    let column = |name: &str| -> Result<Option<String>, DomainError> {
        row.try_get::<Option<String>, _>(name)
            .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", name, e)))
    };

    let raw_id: String = row
        .try_get("customer_id")
        .map_err(|e| DomainError::storage(format!("Failed to read customer_id: {}", e)))?;

    // CHAR(5) columns in imported Northwind data come back space padded
    let customer_id = CustomerId::new(raw_id.trim_end())
        .map_err(|e| DomainError::storage(format!("Invalid customer ID in database: {}", e)))?;

    Ok(Customer {
        customer_id,
        company_name: column("company_name")?.unwrap_or_default(),
        contact_name: column("contact_name")?,
        contact_title: column("contact_title")?,
        address: column("address")?,
        city: column("city")?,
        region: column("region")?,
        postal_code: column("postal_code")?,
        country: column("country")?,
        phone: column("phone")?,
        fax: column("fax")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://db/northwind")
            .with_max_connections(20)
            .with_min_connections(2)
            .with_connect_timeout(5);

        assert_eq!(config.url, "postgres://db/northwind");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn test_column_list_matches_table_definition() {
        for column in CUSTOMER_COLUMNS.split(',').map(str::trim) {
            assert!(
                CREATE_TABLE_SQL.contains(column),
                "column {} missing from table definition",
                column
            );
        }
        assert_eq!(CUSTOMER_COLUMNS.split(',').count(), 11);
    }
}
