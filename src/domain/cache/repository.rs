//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Expiration policy attached to a single cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Time-to-live resets every time the entry is read or written
    Sliding(Duration),
    /// Time-to-live counts down from the last write only
    Absolute(Duration),
}

impl Expiration {
    /// Returns the configured window
    pub fn duration(&self) -> Duration {
        match self {
            Self::Sliding(d) | Self::Absolute(d) => *d,
        }
    }
}

/// Generic cache trait for key-value operations with per-entry expiration
///
/// This trait uses JSON strings internally to be dyn-compatible.
/// Use the helper methods on [`CacheExt`] for typed get/set operations.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw JSON value from the cache
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw JSON value in the cache with an expiration policy
    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        expiration: Expiration,
    ) -> Result<(), DomainError>;

    /// Deletes a value from the cache, returning whether it was present
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Checks if a key exists in the cache
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get_raw(key).await?.is_some())
    }

    /// Clears all entries from the cache
    async fn clear(&self) -> Result<(), DomainError>;

    /// Returns approximate number of entries in the cache
    async fn size(&self) -> Result<usize, DomainError>;
}

/// Extension trait providing typed get/set operations
pub trait CacheExt: Cache {
    /// Gets a typed value from the cache
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::cache(format!("Failed to deserialize cache value: {}", e))
                    })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Sets a typed value in the cache
    fn set<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        expiration: Expiration,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::cache(format!("Failed to serialize cache value: {}", e))
            })?;
            self.set_raw(key, &data, expiration).await
        }
    }
}

// Blanket implementation for all types implementing Cache
impl<T: Cache + ?Sized> CacheExt for T {}
