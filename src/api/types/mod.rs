//! API request and response types

pub mod customer;
pub mod error;
pub mod json;
pub mod negotiate;
pub mod problem;

pub use customer::{CustomerListQuery, CustomerPayload};
pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use negotiate::{Accept, MediaFormat, Negotiated, Payload};
pub use problem::ProblemDetails;
