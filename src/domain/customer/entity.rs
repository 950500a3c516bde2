//! Customer entity and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    validate_company_name, validate_customer_id, validate_max_length, CustomerValidationError,
};

/// Customer identifier - up to five ASCII letters/digits, always upper-case
///
/// Construction normalizes the case, so `"alfki"` and `"ALFKI"` produce the
/// same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    /// Create a new CustomerId after validation
    pub fn new(id: impl AsRef<str>) -> Result<Self, CustomerValidationError> {
        let id = id.as_ref();
        validate_customer_id(id)?;
        Ok(Self(id.to_ascii_uppercase()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CustomerId {
    type Error = CustomerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer record
///
/// Descriptive attributes are opaque to the repository; only `customer_id`
/// and `country` take part in lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[schema(value_type = String, example = "ALFKI")]
    pub customer_id: CustomerId,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
}

impl Customer {
    /// Create a customer with only the required columns set
    pub fn new(customer_id: CustomerId, company_name: impl Into<String>) -> Self {
        Self {
            customer_id,
            company_name: company_name.into(),
            contact_name: None,
            contact_title: None,
            address: None,
            city: None,
            region: None,
            postal_code: None,
            country: None,
            phone: None,
            fax: None,
        }
    }

    pub fn with_contact(mut self, name: impl Into<String>, title: impl Into<String>) -> Self {
        self.contact_name = Some(name.into());
        self.contact_title = Some(title.into());
        self
    }

    pub fn with_address(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        self.address = Some(address.into());
        self.city = Some(city.into());
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Check column constraints of the customers table
    pub fn validate(&self) -> Result<(), CustomerValidationError> {
        validate_company_name(&self.company_name)?;
        validate_max_length("contactName", self.contact_name.as_deref(), 30)?;
        validate_max_length("contactTitle", self.contact_title.as_deref(), 30)?;
        validate_max_length("address", self.address.as_deref(), 60)?;
        validate_max_length("city", self.city.as_deref(), 15)?;
        validate_max_length("region", self.region.as_deref(), 15)?;
        validate_max_length("postalCode", self.postal_code.as_deref(), 10)?;
        validate_max_length("country", self.country.as_deref(), 15)?;
        validate_max_length("phone", self.phone.as_deref(), 24)?;
        validate_max_length("fax", self.fax.as_deref(), 24)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_is_normalized_to_upper_case() {
        let lower = CustomerId::new("alfki").unwrap();
        let upper = CustomerId::new("ALFKI").unwrap();

        assert_eq!(lower, upper);
        assert_eq!(lower.as_str(), "ALFKI");
        assert_eq!(lower.to_string(), "ALFKI");
    }

    #[test]
    fn test_customer_id_rejects_invalid_input() {
        assert!(CustomerId::new("").is_err());
        assert!(CustomerId::new("TOOLONG").is_err());
        assert!(CustomerId::new("a b").is_err());
    }

    #[test]
    fn test_customer_serializes_camel_case() {
        let customer = Customer::new(CustomerId::new("alfki").unwrap(), "Alfreds Futterkiste")
            .with_country("Germany");

        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["customerId"], "ALFKI");
        assert_eq!(json["companyName"], "Alfreds Futterkiste");
        assert_eq!(json["country"], "Germany");
        assert!(json.get("fax").is_none());
    }

    #[test]
    fn test_customer_deserialization_normalizes_id() {
        let json = r#"{"customerId": "anatr", "companyName": "Ana Trujillo"}"#;
        let customer: Customer = serde_json::from_str(json).unwrap();

        assert_eq!(customer.customer_id.as_str(), "ANATR");
        assert_eq!(customer.country, None);
    }

    #[test]
    fn test_customer_deserialization_rejects_bad_id() {
        let json = r#"{"customerId": "", "companyName": "Nobody"}"#;
        assert!(serde_json::from_str::<Customer>(json).is_err());
    }

    #[test]
    fn test_validate_column_lengths() {
        let id = CustomerId::new("BERGS").unwrap();
        assert!(Customer::new(id.clone(), "Berglunds snabbköp").validate().is_ok());

        let too_long_city = Customer::new(id, "Berglunds snabbköp")
            .with_address("Berguvsvägen 8", "A city name far too long", "S-958 22");
        assert_eq!(
            too_long_city.validate(),
            Err(CustomerValidationError::FieldTooLong {
                field: "city",
                max: 15
            })
        );
    }
}
