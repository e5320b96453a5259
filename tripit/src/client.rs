//! HTTP client for the TripIt v1 API.
//!
//! Every call is a single request with basic auth and no retries. Callers
//! decide whether a failure is fatal.

use reqwest::{Method, StatusCode};

use crate::error::{TripItError, TripItResult};
use crate::filter::{Filter, format_filters};
use crate::types::{Flight, Response};

/// TripIt API host.
pub const API_URI: &str = "https://api.tripit.com";
/// TripIt API version path.
pub const API_VERSION: &str = "v1";

const LIST_TRIPS_ENDPOINT: &str = "/list/trip";
const LIST_OBJECTS_ENDPOINT: &str = "/list/object";

/// Object type name TripIt uses for flights.
const TYPE_FLIGHT: &str = "air";

/// TripIt API client holding basic-auth credentials.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl Client {
    /// Create a client against the production API.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_base_url(format!("{}/{}", API_URI, API_VERSION), username, password)
    }

    /// Create a client against another base URL (e.g. a mock server).
    pub fn with_base_url(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Client {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// List trips (and, with `include_objects`, their objects).
    pub async fn list_trips(&self, filters: &[Filter]) -> TripItResult<Response> {
        let endpoint = format!("{}/{}", LIST_TRIPS_ENDPOINT, format_filters(filters));
        self.do_request(Method::GET, &endpoint).await
    }

    /// List objects across trips.
    pub async fn list_objects(&self, filters: &[Filter]) -> TripItResult<Response> {
        let endpoint = format!("{}/{}", LIST_OBJECTS_ENDPOINT, format_filters(filters));
        self.do_request(Method::GET, &endpoint).await
    }

    /// Fetch a single flight by id.
    pub async fn get_flight(&self, id: &str) -> TripItResult<Flight> {
        let endpoint = format!("get/{}/id/{}", TYPE_FLIGHT, id);
        let resp = self.do_request(Method::GET, &endpoint).await?;

        resp.flights
            .into_iter()
            .next()
            .ok_or_else(|| TripItError::EmptyResult {
                kind: TYPE_FLIGHT,
                id: id.to_string(),
            })
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/format/json",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_matches('/')
        )
    }

    async fn do_request(&self, method: Method, endpoint: &str) -> TripItResult<Response> {
        let url = self.url_for(endpoint);
        tracing::debug!(%method, %url, "tripit request");

        let res = self
            .http
            .request(method.clone(), &url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|source| TripItError::Request {
                method: method.to_string(),
                url: url.clone(),
                source,
            })?;

        let status = res.status();

        if status != StatusCode::OK {
            // Diagnostic only; a read error leaves it empty.
            let body = res.text().await.unwrap_or_default();
            return Err(TripItError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                message: status_message(status).to_string(),
                body,
            });
        }

        let body = res.text().await.map_err(|source| TripItError::Request {
            method: method.to_string(),
            url: url.clone(),
            source,
        })?;

        let resp = decode_response(&body).map_err(|source| TripItError::Decode {
            method: method.to_string(),
            url: url.clone(),
            body: body.clone(),
            source,
        })?;

        for warning in &resp.warnings {
            tracing::warn!(
                "[{}] {}: {}",
                warning.timestamp,
                warning.entity_type,
                warning.description
            );
        }

        for e in &resp.errors {
            tracing::error!(
                "[{}] {} code -> {}, detailed code -> {}: {}",
                e.timestamp,
                e.entity_type,
                e.code,
                e.detailed_error_code,
                e.description
            );
        }

        Ok(resp)
    }
}

/// Human-readable diagnostics for the status codes TripIt documents.
pub fn status_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => {
            "The request was either invalid or malformed in some way. For example, a create call with no xml or json request parameter in the POST args would return a 400 Bad Request from the server."
        }
        401 => {
            "The OAuth Consumer has errored for one of the following reasons:
1) The authentication credentials passed to the API for the request were somehow invalid. This status code could be caused by an invalid username/password combination used in the web authentication scheme or an invalid OAuth token for the OAuth scheme.
2) The TripIt account for which the consumer was authorized is no longer authorizing it.
3) The OAuth Consumer key has been de-activated."
        }
        403 => {
            "The OAuth Consumer is not yet confirmed. The most common situation in which this happens is when a new account that authorizes an API client hasn't been confirmed before the API client attempts to execute a read operation on the API (e.g. /v1/list/trip)."
        }
        404 => {
            "Either the resource URL or the object the client was requesting either does not exist or the user the client was authenticated and does not have permission to operate on the object."
        }
        500 => {
            "Something catastrophic happened while the TripIt platform was trying to complete the request. A 500 error is a pretty serious and catastrophic problem that should be reported to the TripIt engineering team through support@tripit.com."
        }
        503 => "The TripIt API is currently undergoing maintenance and is not available.",
        _ => "unexpected status code from the TripIt API",
    }
}

/// serde can't bind a field to an `@`-prefixed key through our types, so
/// TripIt's `"@attributes"` objects are renamed before decoding.
pub fn rewrite_attribute_keys(body: &str) -> String {
    body.replace("\"@attributes\"", "\"_attributes\"")
}

/// Decode a raw response body into a `Response`.
pub fn decode_response(body: &str) -> Result<Response, serde_json::Error> {
    serde_json::from_str(&rewrite_attribute_keys(body))
}
