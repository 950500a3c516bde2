use thiserror::Error;

/// Faults raised by the store or the cache
///
/// Expected business outcomes (a missing customer, a write that touched no
/// rows) are not errors; they are reported through
/// [`Outcome`](crate::domain::customer::Outcome).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl DomainError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Which backing component failed
    pub fn component(&self) -> &'static str {
        match self {
            Self::Storage { .. } => "storage",
            Self::Cache { .. } => "cache",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error() {
        let error = DomainError::storage("connection refused");
        assert_eq!(error.to_string(), "Storage error: connection refused");
        assert_eq!(error.component(), "storage");
    }

    #[test]
    fn test_cache_error() {
        let error = DomainError::cache("serialization failed");
        assert_eq!(error.to_string(), "Cache error: serialization failed");
        assert_eq!(error.component(), "cache");
    }
}
