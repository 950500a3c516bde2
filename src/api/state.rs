//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::domain::customer::{CustomerRepository, CustomerStore};

/// Application state shared by every request handler
///
/// All handles are process-wide: the repository is stateless apart from the
/// store pool and the single cache instance it was built with.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn CustomerRepository>,
    pub store: Arc<dyn CustomerStore>,
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        store: Arc<dyn CustomerStore>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            customers,
            store,
            cache,
        }
    }
}
