//! Customer request types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::negotiate::{to_xml_with_root, XmlDocument, XmlError};
use crate::domain::customer::{Customer, CustomerId, CustomerValidationError};

/// Customer body accepted by POST and PUT
///
/// The identifier stays a raw string here so that an empty or malformed id
/// is reported as a validation failure instead of a parse error.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub company_name: String,
    pub contact_name: Option<String>,
    pub contact_title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
}

impl TryFrom<CustomerPayload> for Customer {
    type Error = CustomerValidationError;

    fn try_from(payload: CustomerPayload) -> Result<Self, Self::Error> {
        let customer = Customer {
            customer_id: CustomerId::new(&payload.customer_id)?,
            company_name: payload.company_name,
            contact_name: payload.contact_name,
            contact_title: payload.contact_title,
            address: payload.address,
            city: payload.city,
            region: payload.region,
            postal_code: payload.postal_code,
            country: payload.country,
            phone: payload.phone,
            fax: payload.fax,
        };

        customer.validate()?;
        Ok(customer)
    }
}

/// XML element form of a customer, with PascalCase child elements
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CustomerElement<'a> {
    customer_id: &'a str,
    company_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postal_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fax: Option<&'a str>,
}

impl<'a> From<&'a Customer> for CustomerElement<'a> {
    fn from(customer: &'a Customer) -> Self {
        Self {
            customer_id: customer.customer_id.as_str(),
            company_name: &customer.company_name,
            contact_name: customer.contact_name.as_deref(),
            contact_title: customer.contact_title.as_deref(),
            address: customer.address.as_deref(),
            city: customer.city.as_deref(),
            region: customer.region.as_deref(),
            postal_code: customer.postal_code.as_deref(),
            country: customer.country.as_deref(),
            phone: customer.phone.as_deref(),
            fax: customer.fax.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct ArrayOfCustomer<'a> {
    #[serde(rename = "Customer")]
    customers: Vec<CustomerElement<'a>>,
}

impl XmlDocument for Customer {
    fn to_xml(&self) -> Result<String, XmlError> {
        to_xml_with_root("Customer", &CustomerElement::from(self))
    }
}

impl XmlDocument for Vec<Customer> {
    fn to_xml(&self) -> Result<String, XmlError> {
        let document = ArrayOfCustomer {
            customers: self.iter().map(CustomerElement::from).collect(),
        };
        to_xml_with_root("ArrayOfCustomer", &document)
    }
}

/// Query string of the listing endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerListQuery {
    /// Exact, case-sensitive country match
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> CustomerPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_payload_converts_and_normalizes() {
        let customer = Customer::try_from(payload(
            r#"{"customerId": "alfki", "companyName": "Alfreds Futterkiste", "country": "Germany"}"#,
        ))
        .unwrap();

        assert_eq!(customer.customer_id.as_str(), "ALFKI");
        assert_eq!(customer.country.as_deref(), Some("Germany"));
    }

    #[test]
    fn test_payload_missing_id_is_validation_error() {
        let result = Customer::try_from(payload(r#"{"companyName": "Nameless"}"#));
        assert_eq!(result, Err(CustomerValidationError::EmptyId));
    }

    #[test]
    fn test_payload_missing_company_is_validation_error() {
        let result = Customer::try_from(payload(r#"{"customerId": "ALFKI"}"#));
        assert_eq!(result, Err(CustomerValidationError::EmptyCompanyName));
    }

    #[test]
    fn test_customer_xml_document() {
        let customer = Customer::new(CustomerId::new("ALFKI").unwrap(), "Alfreds Futterkiste")
            .with_country("Germany");

        let xml = customer.to_xml().unwrap();

        assert!(xml.starts_with("<Customer>"));
        assert!(xml.contains("<CustomerId>ALFKI</CustomerId>"));
        assert!(xml.contains("<CompanyName>Alfreds Futterkiste</CompanyName>"));
        assert!(xml.contains("<Country>Germany</Country>"));
        assert!(!xml.contains("<Fax"));
    }

    #[test]
    fn test_customer_list_xml_document() {
        let customers = vec![
            Customer::new(CustomerId::new("ALFKI").unwrap(), "Alfreds Futterkiste"),
            Customer::new(CustomerId::new("ANATR").unwrap(), "Ana Trujillo"),
        ];

        let xml = customers.to_xml().unwrap();

        assert!(xml.starts_with("<ArrayOfCustomer>"));
        assert_eq!(xml.matches("<Customer>").count(), 2);
        assert!(xml.contains("<CustomerId>ANATR</CustomerId>"));
    }

    #[test]
    fn test_empty_customer_list_xml_document() {
        let xml = Vec::<Customer>::new().to_xml().unwrap();
        assert!(xml.starts_with("<ArrayOfCustomer"));
        assert!(!xml.contains("<Customer>"));
    }
}
