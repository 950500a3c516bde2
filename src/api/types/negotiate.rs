//! JSON/XML content negotiation for customer bodies
//!
//! Request bodies are read according to `Content-Type`, responses are written
//! according to `Accept`. JSON is the default in both directions.

use std::collections::BTreeMap;
use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::error::ApiError;
use super::json::Json;

pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Wire format of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFormat {
    #[default]
    Json,
    Xml,
}

impl MediaFormat {
    fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "application/json" | "text/json" | "application/*" | "*/*" => Some(Self::Json),
            "application/xml" | "text/xml" => Some(Self::Xml),
            other if other.ends_with("+json") => Some(Self::Json),
            other if other.ends_with("+xml") => Some(Self::Xml),
            _ => None,
        }
    }

    /// Format of the request body; `None` when the content type is absent or unknown
    pub fn from_content_type(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
        let media_type = value.split(';').next()?.trim().to_ascii_lowercase();

        Self::from_media_type(&media_type)
    }

    /// Preferred response format, honoring `q` weights
    ///
    /// Ties go to the range listed first. Unsupported ranges are skipped and
    /// a missing or unusable header falls back to JSON.
    pub fn from_accept(headers: &HeaderMap) -> Self {
        let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) else {
            return Self::Json;
        };

        let mut best: Option<(f32, Self)> = None;

        for range in accept.split(',') {
            let mut params = range.split(';');
            let media_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
            let quality = params
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);

            let Some(format) = Self::from_media_type(&media_type) else {
                continue;
            };

            if quality > 0.0 && best.is_none_or(|(q, _)| quality > q) {
                best = Some((quality, format));
            }
        }

        best.map(|(_, format)| format).unwrap_or_default()
    }
}

/// Response format chosen from the `Accept` header
#[derive(Debug, Clone, Copy)]
pub struct Accept(pub MediaFormat);

impl<S> FromRequestParts<S> for Accept
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(MediaFormat::from_accept(&parts.headers)))
    }
}

/// Request body in JSON or XML; `None` for a JSON `null` or an empty XML body
#[derive(Debug)]
pub struct Payload<T>(pub Option<T>);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if MediaFormat::from_content_type(req.headers()) != Some(MediaFormat::Xml) {
            return Json::<Option<T>>::from_request(req, state)
                .await
                .map(|Json(value)| Self(value))
                .map_err(IntoResponse::into_response);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        parse_xml(&bytes).map(Self).map_err(|e| {
            ApiError::bad_request(format!("Invalid XML body: {}", e))
                .with_code("xml_parse_error")
                .into_response()
        })
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct XmlError(String);

/// Read a flat XML element into `T`
///
/// Child element names are matched against the camelCase field names, so both
/// `<customerId>` and `<CustomerId>`/`<CustomerID>` are accepted. Attributes
/// such as namespace declarations are ignored.
fn parse_xml<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<T>, XmlError> {
    let text = std::str::from_utf8(bytes).map_err(|e| XmlError(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(None);
    }

    let elements: BTreeMap<String, String> =
        quick_xml::de::from_str(text).map_err(|e| XmlError(e.to_string()))?;

    let fields: serde_json::Map<String, serde_json::Value> = elements
        .into_iter()
        .filter(|(name, _)| !name.starts_with('@') && !name.starts_with('$'))
        .map(|(name, value)| (field_name(&name), serde_json::Value::String(value)))
        .collect();

    serde_json::from_value(serde_json::Value::Object(fields))
        .map(Some)
        .map_err(|e| XmlError(e.to_string()))
}

fn field_name(element: &str) -> String {
    let element = element.strip_suffix("ID").map_or_else(
        || element.to_string(),
        |stem| format!("{}Id", stem),
    );

    let mut chars = element.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => element,
    }
}

/// Values that have an XML document form
pub trait XmlDocument {
    fn to_xml(&self) -> Result<String, XmlError>;
}

/// Serialize `value` as an XML document with the given root element
pub fn to_xml_with_root<T: Serialize>(root: &str, value: &T) -> Result<String, XmlError> {
    quick_xml::se::to_string_with_root(root, value).map_err(|e| XmlError(e.to_string()))
}

/// Response body written in the negotiated format
#[derive(Debug)]
pub struct Negotiated<T> {
    format: MediaFormat,
    value: T,
}

impl<T> Negotiated<T> {
    pub fn new(format: MediaFormat, value: T) -> Self {
        Self { format, value }
    }
}

impl<T> IntoResponse for Negotiated<T>
where
    T: Serialize + XmlDocument,
{
    fn into_response(self) -> Response {
        match self.format {
            MediaFormat::Json => Json(self.value).into_response(),
            MediaFormat::Xml => match self.value.to_xml() {
                Ok(xml) => (
                    [(header::CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE))],
                    xml,
                )
                    .into_response(),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to write XML response");
                    ApiError::internal("Failed to write the response body").into_response()
                }
            },
        }
    }
}
