//! Request dispatch and response normalization
//!
//! Every endpoint call ends up here. Public calls are plain GETs; private
//! calls get a fresh nonce, a form-encoded body and an `API-Sign` header
//! computed over exactly the bytes that are sent.

use kraken_auth::{Credentials, NonceSource};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{RestError, RestResult};
use crate::transport::{HttpRequest, HttpTransport, TransportError};

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.kraken.com";
/// Default API version path segment
pub const DEFAULT_API_VERSION: u32 = 0;

/// Request parameters, in the order they are encoded
pub type Params<'a> = Vec<(&'a str, String)>;

/// Standard Kraken API response wrapper
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Error messages (empty if successful)
    #[serde(default)]
    pub error: Vec<String>,
    /// Result data (present if successful)
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }

    /// Get the result, returning an error if the API returned errors
    pub fn into_result(self) -> RestResult<T> {
        if !self.error.is_empty() {
            return Err(RestError::from_api_errors(self.error));
        }
        self.result
            .ok_or_else(|| RestError::MalformedResponse("no result in response".to_string()))
    }
}

/// Decode a response body into the envelope's `result`
///
/// An empty body is [`RestError::EmptyResponse`]; a body that is not an
/// envelope, or a successful envelope without `result`, is
/// [`RestError::MalformedResponse`]; a non-empty `error` array is
/// [`RestError::Api`].
pub fn normalize_response(body: &str) -> RestResult<Value> {
    if body.trim().is_empty() {
        return Err(RestError::EmptyResponse);
    }

    let envelope: ApiResponse<Value> =
        serde_json::from_str(body).map_err(|e| RestError::MalformedResponse(e.to_string()))?;

    // `"result": null` deserializes as None and is rejected with the rest
    envelope.into_result()
}

/// Decode a normalized result into a typed response
pub fn decode_result<T: DeserializeOwned>(result: Value) -> RestResult<T> {
    serde_json::from_value(result).map_err(|e| RestError::MalformedResponse(e.to_string()))
}

/// Builds, signs and sends requests
pub struct Dispatcher<T> {
    transport: T,
    base_url: String,
    api_version: u32,
    credentials: Option<Credentials>,
    nonces: NonceSource,
}

impl<T: HttpTransport> Dispatcher<T> {
    /// Create a dispatcher
    pub fn new(
        transport: T,
        base_url: impl Into<String>,
        api_version: u32,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version,
            credentials,
            nonces: NonceSource::new(),
        }
    }

    /// Replace the nonce source
    pub fn with_nonce_source(mut self, nonces: NonceSource) -> Self {
        self.nonces = nonces;
        self
    }

    /// Credentials used for private calls
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Nonce source for private calls
    pub fn nonces(&self) -> &NonceSource {
        &self.nonces
    }

    /// Path of a public method, e.g. `/0/public/Ticker`
    pub fn public_path(&self, method: &str) -> String {
        format!("/{}/public/{}", self.api_version, method)
    }

    /// Path of a private method, e.g. `/0/private/Balance`
    pub fn private_path(&self, method: &str) -> String {
        format!("/{}/private/{}", self.api_version, method)
    }

    /// Call a public method and return the raw `result`
    #[instrument(skip(self, params), fields(param_count = params.len()))]
    pub async fn dispatch_public(&self, method: &str, params: &[(&str, String)]) -> RestResult<Value> {
        let mut url = format!("{}{}", self.base_url, self.public_path(method));

        if !params.is_empty() {
            let query = serde_urlencoded::to_string(params)
                .map_err(|e| RestError::validation("params", e.to_string()))?;
            url.push('?');
            url.push_str(&query);
        }

        debug!("GET {}", url);
        self.send(HttpRequest::get(url)).await
    }

    /// Call a private method and return the raw `result`
    ///
    /// The nonce is drawn once and used both in the body and in the
    /// signature.
    #[instrument(skip(self, params), fields(param_count = params.len()))]
    pub async fn dispatch_private(&self, method: &str, params: &[(&str, String)]) -> RestResult<Value> {
        let credentials = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;
        let path = self.private_path(method);

        let nonce = self.nonces.next().to_string();

        let mut post_params: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        post_params.push(("nonce", nonce.as_str()));
        post_params.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let post_data = serde_urlencoded::to_string(&post_params)
            .map_err(|e| RestError::validation("params", e.to_string()))?;

        let signature = credentials.sign(&path, &nonce, &post_data)?;
        let url = format!("{}{}", self.base_url, path);

        debug!("Making authenticated request to {}", path);

        let request = HttpRequest::post(url)
            .header("API-Key", credentials.api_key())
            .header("API-Sign", signature)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(post_data);

        self.send(request).await
    }

    /// Call a public method and decode the result
    pub async fn public<R: DeserializeOwned>(&self, method: &str, params: &[(&str, String)]) -> RestResult<R> {
        decode_result(self.dispatch_public(method, params).await?)
    }

    /// Call a private method and decode the result
    pub async fn private<R: DeserializeOwned>(&self, method: &str, params: &[(&str, String)]) -> RestResult<R> {
        decode_result(self.dispatch_private(method, params).await?)
    }

    async fn send(&self, request: HttpRequest) -> RestResult<Value> {
        let response = self.transport.execute(request).await?;

        if response.is_success() {
            return normalize_response(&response.body);
        }

        warn!(status = response.status, "Non-success HTTP status");
        match normalize_response(&response.body) {
            Err(RestError::EmptyResponse | RestError::MalformedResponse(_)) => {
                Err(TransportError::Status(response.status).into())
            }
            other => other,
        }
    }
}

impl<T> std::fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}
