//! Customer domain
//!
//! Entity, validation rules and the two seams of the customer service: the
//! persistent [`CustomerStore`] and the cache-aware [`CustomerRepository`].

mod entity;
mod repository;
mod validation;

pub use entity::{Customer, CustomerId};
pub use repository::{CustomerFilter, CustomerRepository, CustomerStore, Outcome};
pub use validation::{
    validate_company_name, validate_customer_id, CustomerValidationError,
    MAX_COMPANY_NAME_LENGTH, MAX_CUSTOMER_ID_LENGTH,
};

#[cfg(test)]
pub use repository::MockCustomerStore;
