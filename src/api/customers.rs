//! Customer endpoint handlers

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{debug, info, warn};

use crate::api::state::AppState;
use crate::api::types::{
    Accept, ApiError, ApiErrorResponse, CustomerListQuery, CustomerPayload, Negotiated, Payload,
    ProblemDetails,
};
use crate::domain::customer::{
    Customer, CustomerFilter, CustomerId, CustomerValidationError, Outcome,
};

/// Id rejected by DELETE to demonstrate problem-details responses
pub const RESERVED_FAILING_ID: &str = "bad";

const CUSTOMERS_BASE_PATH: &str = "/api/customers";

/// Create the customers router, mounted under `/api/customers`
pub fn create_customers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{customer_id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(CustomerListQuery),
    responses(
        (status = 200, description = "Customers, optionally filtered by country", content(
            (Vec<Customer> = "application/json"),
            (Vec<Customer> = "application/xml")
        )),
        (status = 500, description = "Store or cache failure", body = ApiErrorResponse),
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Accept(format): Accept,
    Query(query): Query<CustomerListQuery>,
) -> Result<Negotiated<Vec<Customer>>, ApiError> {
    let filter = match query.country {
        Some(country) => CustomerFilter::by_country(country),
        None => CustomerFilter::all(),
    };

    debug!(country = ?filter.country, "Listing customers");

    let customers = state.customers.retrieve_all(&filter).await?;

    Ok(Negotiated::new(format, customers))
}

/// GET /api/customers/{customer_id}
#[utoipa::path(
    get,
    path = "/api/customers/{customer_id}",
    tag = "Customers",
    params(("customer_id" = String, Path, description = "Customer id, matched case-insensitively")),
    responses(
        (status = 200, description = "Customer found", content(
            (Customer = "application/json"),
            (Customer = "application/xml")
        )),
        (status = 404, description = "Customer not found", body = ApiErrorResponse),
        (status = 500, description = "Store or cache failure", body = ApiErrorResponse),
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Accept(format): Accept,
    Path(customer_id): Path<String>,
) -> Result<Negotiated<Customer>, ApiError> {
    debug!(customer_id = %customer_id, "Getting customer");

    let id = parse_path_id(&customer_id)?;

    let customer = state
        .customers
        .retrieve(&id)
        .await?
        .ok_or_else(|| customer_not_found(&id))?;

    Ok(Negotiated::new(format, customer))
}

/// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body(content(
        (CustomerPayload = "application/json"),
        (CustomerPayload = "application/xml")
    )),
    responses(
        (status = 201, description = "Customer created; Location names the new resource", content(
            (Customer = "application/json"),
            (Customer = "application/xml")
        )),
        (status = 400, description = "Missing or invalid body, or the insert affected no rows", body = ApiErrorResponse),
        (status = 415, description = "Body is neither JSON nor XML", body = ApiErrorResponse),
        (status = 500, description = "Store or cache failure", body = ApiErrorResponse),
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Accept(format): Accept,
    Payload(payload): Payload<CustomerPayload>,
) -> Result<Response, ApiError> {
    let customer = customer_from_payload(payload)?;
    let id = customer.customer_id.clone();

    debug!(customer_id = %id, "Creating customer");

    match state.customers.create(customer).await? {
        Outcome::Success(created) => {
            info!(customer_id = %id, "Customer created");

            let location = format!("{}/{}", CUSTOMERS_BASE_PATH, id);
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Negotiated::new(format, created),
            )
                .into_response())
        }
        Outcome::NotFound | Outcome::WriteFailed => {
            Err(ApiError::bad_request("Repository failed to create the customer")
                .with_code("create_failed"))
        }
    }
}

/// PUT /api/customers/{customer_id}
#[utoipa::path(
    put,
    path = "/api/customers/{customer_id}",
    tag = "Customers",
    params(("customer_id" = String, Path, description = "Must match the id in the body")),
    request_body(content(
        (CustomerPayload = "application/json"),
        (CustomerPayload = "application/xml")
    )),
    responses(
        (status = 204, description = "Customer updated"),
        (status = 400, description = "Missing or invalid body, id mismatch, or the update affected no rows", body = ApiErrorResponse),
        (status = 404, description = "Customer not found", body = ApiErrorResponse),
        (status = 500, description = "Store or cache failure", body = ApiErrorResponse),
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Payload(payload): Payload<CustomerPayload>,
) -> Result<StatusCode, ApiError> {
    let customer = customer_from_payload(payload)?;

    let path_id = CustomerId::new(&customer_id).ok();
    if path_id.as_ref() != Some(&customer.customer_id) {
        return Err(ApiError::bad_request(format!(
            "Customer ID in path '{}' does not match customer ID in body '{}'",
            customer_id, customer.customer_id
        ))
        .with_param("customerId")
        .with_code("id_mismatch"));
    }

    let id = customer.customer_id.clone();
    debug!(customer_id = %id, "Updating customer");

    if state.customers.retrieve(&id).await?.is_none() {
        return Err(customer_not_found(&id));
    }

    match state.customers.update(customer).await? {
        Outcome::Success(_) => {
            info!(customer_id = %id, "Customer updated");
            Ok(StatusCode::NO_CONTENT)
        }
        Outcome::NotFound => Err(customer_not_found(&id)),
        Outcome::WriteFailed => {
            Err(ApiError::bad_request("Repository failed to update the customer")
                .with_code("update_failed"))
        }
    }
}

/// DELETE /api/customers/{customer_id}
#[utoipa::path(
    delete,
    path = "/api/customers/{customer_id}",
    tag = "Customers",
    params(("customer_id" = String, Path, description = "Customer id; `bad` always fails")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 400, description = "Reserved id `bad`", body = ProblemDetails,
            content_type = "application/problem+json"),
        (status = 404, description = "Customer not found", body = ApiErrorResponse),
        (status = 500, description = "Store or cache failure", body = ApiErrorResponse),
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ApiError> {
    if customer_id == RESERVED_FAILING_ID {
        warn!(customer_id = %customer_id, "Rejecting delete of reserved customer id");

        let problem = ProblemDetails::new(
            StatusCode::BAD_REQUEST,
            "/customers/failed-to-delete",
            format!("Customer ID {} found but failed to delete.", customer_id),
        )
        .with_detail("More details like company name, country and so on.")
        .with_instance(uri.path());

        return Ok(problem.into_response());
    }

    let id = parse_path_id(&customer_id)?;
    debug!(customer_id = %id, "Deleting customer");

    match state.customers.delete(&id).await? {
        Outcome::Success(()) => {
            info!(customer_id = %id, "Customer deleted");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        Outcome::NotFound => Err(customer_not_found(&id)),
        Outcome::WriteFailed => Err(ApiError::bad_request(format!(
            "Customer {} was found but failed to delete",
            id
        ))
        .with_code("delete_failed")),
    }
}

/// A path id that can never name a customer is reported as absent
fn parse_path_id(raw: &str) -> Result<CustomerId, ApiError> {
    CustomerId::new(raw)
        .map_err(|_| ApiError::not_found(format!("Customer '{}' not found", raw)))
}

fn customer_not_found(id: &CustomerId) -> ApiError {
    ApiError::not_found(format!("Customer '{}' not found", id))
}

fn customer_from_payload(payload: Option<CustomerPayload>) -> Result<Customer, ApiError> {
    let payload = payload.ok_or_else(|| {
        ApiError::bad_request("Request body must contain a customer").with_code("missing_body")
    })?;

    Customer::try_from(payload).map_err(invalid_customer)
}

fn invalid_customer(err: CustomerValidationError) -> ApiError {
    let param = match &err {
        CustomerValidationError::EmptyId
        | CustomerValidationError::IdTooLong(_)
        | CustomerValidationError::InvalidIdCharacter(_) => "customerId",
        CustomerValidationError::EmptyCompanyName => "companyName",
        CustomerValidationError::FieldTooLong { field, .. } => *field,
    };

    ApiError::bad_request(err.to_string())
        .with_param(param)
        .with_code("invalid_customer")
}
