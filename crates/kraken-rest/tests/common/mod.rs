//! Common test utilities and fixtures for integration tests
//!
//! Response bodies are trimmed copies of real Kraken REST responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use kraken_rest::{
    ClientConfig, Credentials, HttpRequest, HttpResponse, HttpTransport, KrakenRestClient,
    TransportError,
};
use parking_lot::Mutex;

/// Secret from Kraken's signing documentation
pub const DOC_SECRET: &str =
    "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";

/// API key paired with [`DOC_SECRET`] in tests
pub const TEST_API_KEY: &str = "test-api-key";

pub const SERVER_TIME: &str =
    r#"{"error":[],"result":{"unixtime":1688669448,"rfc1123":"Thu, 06 Jul 23 18:50:48 +0000"}}"#;

pub const TRADES_LAST_42: &str = r#"{
    "error": [],
    "result": {
        "XXBTZUSD": [
            ["30243.40000", "0.34507674", 1688669597.8277369, "b", "m", "", 61044952]
        ],
        "last": 42
    }
}"#;

pub const TRADES_LAST_43: &str =
    r#"{"error":[],"result":{"XXBTZUSD":[],"last":"43"}}"#;

pub const ETH_TRADES_LAST_7: &str =
    r#"{"error":[],"result":{"XETHZUSD":[],"last":"7"}}"#;

pub const BALANCE: &str =
    r#"{"error":[],"result":{"ZUSD":"171288.6158","XXBT":"0.0011000000"}}"#;

pub const GENERAL_INVALID: &str = r#"{"error":["EGeneral:Invalid"],"result":null}"#;

/// Transport that replays queued responses and records requests
///
/// Cloning shares the queue, so a test can keep a handle after moving a
/// clone into the client.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, body: &str) -> &Self {
        self.responses.lock().push_back(HttpResponse::ok(body));
        self
    }

    pub fn reply_status(&self, status: u16, body: &str) -> &Self {
        self.responses.lock().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| TransportError::Other("script exhausted".to_string()))
    }
}

pub fn public_client() -> (KrakenRestClient<ScriptedTransport>, ScriptedTransport) {
    let transport = ScriptedTransport::new();
    let client = KrakenRestClient::with_transport(
        ClientConfig::new().with_base_url("https://mock.test"),
        transport.clone(),
    );
    (client, transport)
}

pub fn private_client() -> (KrakenRestClient<ScriptedTransport>, ScriptedTransport) {
    let transport = ScriptedTransport::new();
    let creds = Credentials::new(TEST_API_KEY, DOC_SECRET).expect("valid test credentials");
    let client = KrakenRestClient::with_transport(
        ClientConfig::new()
            .with_base_url("https://mock.test")
            .with_credentials(creds),
        transport.clone(),
    );
    (client, transport)
}

/// The nonce sent as the first body parameter
pub fn body_nonce(request: &HttpRequest) -> u64 {
    let body = request.body.as_deref().expect("private request has a body");
    let first = body.split('&').next().unwrap_or_default();
    first
        .strip_prefix("nonce=")
        .expect("body starts with nonce")
        .parse()
        .expect("nonce is numeric")
}

/// URL path of a request, e.g. `/0/private/Balance`
pub fn path_of(request: &HttpRequest) -> String {
    let without_host = request.url.trim_start_matches("https://mock.test");
    without_host
        .split('?')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Recompute `API-Sign` from scratch over what was actually sent
pub fn expected_signature(request: &HttpRequest) -> String {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use hmac::{Hmac, Mac};
    use sha2::{Digest, Sha256, Sha512};

    let body = request.body.as_deref().expect("private request has a body");
    let nonce = body_nonce(request).to_string();

    let mut sha256 = Sha256::new();
    sha256.update(nonce.as_bytes());
    sha256.update(body.as_bytes());
    let digest = sha256.finalize();

    let secret = BASE64.decode(DOC_SECRET).expect("valid base64");
    let mut mac = Hmac::<Sha512>::new_from_slice(&secret).expect("any key length");
    mac.update(path_of(request).as_bytes());
    mac.update(&digest);

    BASE64.encode(mac.finalize().into_bytes())
}
