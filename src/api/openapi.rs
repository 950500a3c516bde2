//! OpenAPI document for the customer endpoints

use axum::Router;
#[cfg(not(feature = "swagger-ui"))]
use axum::{response::IntoResponse, routing::get, Json};
use utoipa::OpenApi;

use super::customers;
use super::types::{ApiErrorDetail, ApiErrorResponse, ApiErrorType, CustomerPayload, ProblemDetails};
use crate::domain::customer::Customer;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Northwind Customers API",
        description = "CRUD over Northwind customers. Bodies are JSON or XML, chosen by Content-Type and Accept."
    ),
    tags(
        (name = "Customers", description = "Customer records backed by a cache-aside repository")
    ),
    paths(
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
    ),
    components(schemas(
        Customer,
        CustomerPayload,
        ApiErrorResponse,
        ApiErrorDetail,
        ApiErrorType,
        ProblemDetails,
    ))
)]
pub struct ApiDoc;

#[cfg(not(feature = "swagger-ui"))]
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Router serving the OpenAPI document, plus Swagger UI when the feature is on
pub fn create_docs_router() -> Router {
    #[cfg(feature = "swagger-ui")]
    {
        use utoipa_swagger_ui::SwaggerUi;
        Router::new().merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()))
    }

    #[cfg(not(feature = "swagger-ui"))]
    {
        Router::new().route(OPENAPI_PATH, get(openapi_json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_paths_exist() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.paths.paths.contains_key("/api/customers"));
        assert!(openapi.paths.paths.contains_key("/api/customers/{customer_id}"));
    }

    #[test]
    fn test_openapi_schemas_exist() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components");

        for name in ["Customer", "CustomerPayload", "ApiErrorResponse", "ProblemDetails"] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }
    }

    #[test]
    fn test_openapi_documents_xml_bodies() {
        let json = ApiDoc::openapi().to_json().unwrap();

        assert!(json.contains("application/xml"));
        assert!(json.contains("\"operationId\":\"create_customer\""));
    }
}
