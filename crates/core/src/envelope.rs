//! Inbound and outbound envelopes exchanged with the HTTP gateway.
//!
//! The inbound envelope is the subset of a proxy-integration event the handler
//! reads; unknown event fields are ignored. The outbound envelope always
//! carries the CORS headers and a JSON-encoded body.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type,Authorization";

/// Event produced by the gateway for every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    /// Matched resource template, e.g. `/patients/{id}`.
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub http_method: Option<String>,
    /// Percent-encoded path parameters (`id`, `noteId`).
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    /// JSON-encoded request body.
    #[serde(default)]
    pub body: Option<String>,
}

impl RequestEnvelope {
    /// Creates an envelope for a resource template and method.
    pub fn new(resource: impl Into<String>, http_method: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            http_method: Some(http_method.into()),
            path_parameters: None,
            body: None,
        }
    }

    /// Adds a raw path parameter.
    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the raw body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the body to the JSON encoding of `value`.
    pub fn with_json_body(self, value: &Value) -> Self {
        self.with_body(value.to_string())
    }

    /// Returns the raw value of a path parameter, if present.
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }
}

/// Response returned to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded payload. `null` for 204 responses.
    pub body: String,
}

impl ResponseEnvelope {
    /// Parses the body back into a JSON value.
    pub fn json_body(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// The CORS headers attached to every response.
pub fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "Access-Control-Allow-Origin".to_string(),
            ALLOW_ORIGIN.to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            ALLOW_METHODS.to_string(),
        ),
        (
            "Access-Control-Allow-Headers".to_string(),
            ALLOW_HEADERS.to_string(),
        ),
    ])
}

/// Wraps a status code and a payload into a CORS-enabled envelope.
///
/// If the payload cannot be encoded, a 500 carrying the encoding error is
/// returned instead.
pub fn respond<T: Serialize + ?Sized>(status_code: u16, payload: &T) -> ResponseEnvelope {
    match serde_json::to_string(payload) {
        Ok(body) => ResponseEnvelope {
            status_code,
            headers: cors_headers(),
            body,
        },
        Err(err) => ResponseEnvelope {
            status_code: 500,
            headers: cors_headers(),
            body: Value::String(format!("Unexpected error: {err}")).to_string(),
        },
    }
}

/// A 204 envelope with a `null` body.
pub fn no_content() -> ResponseEnvelope {
    respond(204, &Value::Null)
}
