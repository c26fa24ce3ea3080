use std::time::Duration;

use base64::Engine as _;
use rand::RngCore;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use scanner_core::{FailureKind, UpstreamError};
use scanner_logging::{scanner_debug, scanner_warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://apis.justwatch.com/graphql";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const SITE_ORIGIN: &str = "https://www.justwatch.com";

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_language: "es-AR,es;q=0.9,en;q=0.8".to_string(),
        }
    }
}

/// One GraphQL operation as posted to the upstream endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub operation_name: &'static str,
    pub query: &'static str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// A single request/response cycle against the upstream service.
///
/// Implementations return the `data` member of a successful response.
#[async_trait::async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, UpstreamError>;
}

/// Runs `request` and decodes its `data` member into `T`.
pub async fn execute_as<T: DeserializeOwned>(
    transport: &dyn GraphqlTransport,
    request: &GraphqlRequest,
) -> Result<T, UpstreamError> {
    let data = transport.execute(request).await?;
    serde_json::from_value(data).map_err(|err| {
        scanner_warn!("{} returned unexpected data: {}", request.operation_name, err);
        UpstreamError::new(FailureKind::MalformedResponse, err.to_string())
    })
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: TransportSettings,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(browser_headers(&settings)?)
            .build()
            .map_err(|err| UpstreamError::new(FailureKind::Connection, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl GraphqlTransport for ReqwestTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, UpstreamError> {
        let body = serde_json::to_vec(request)
            .map_err(|err| UpstreamError::new(FailureKind::MalformedResponse, err.to_string()))?;
        scanner_debug!(
            "POST {} operation={} bytes={}",
            self.settings.endpoint,
            request.operation_name,
            body.len()
        );

        let response = self
            .client
            .post(&self.settings.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| UpstreamError::new(FailureKind::Connection, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.canonical_reason().unwrap_or("unknown status"),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|err| UpstreamError::new(FailureKind::Connection, err.to_string()))?;

        decode_body(&text)
    }
}

/// The upstream signals a temporary block by answering with an HTML page.
pub fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start();
    head.starts_with("<!") || head.get(..5).is_some_and(|tag| tag.eq_ignore_ascii_case("<html"))
}

/// Classifies a response body that arrived with a success status.
pub fn decode_body(text: &str) -> Result<Value, UpstreamError> {
    if looks_like_html(text) {
        return Err(UpstreamError::new(
            FailureKind::SoftBlock,
            "upstream answered with an HTML document",
        ));
    }

    let envelope: GraphqlEnvelope = serde_json::from_str(text)
        .map_err(|err| UpstreamError::new(FailureKind::MalformedResponse, err.to_string()))?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        let message = errors
            .into_iter()
            .next()
            .and_then(|entry| entry.message)
            .unwrap_or_else(|| "GraphQL error".to_string());
        return Err(UpstreamError::new(FailureKind::Upstream, message));
    }

    Ok(envelope.data.unwrap_or(Value::Null))
}

fn browser_headers(settings: &TransportSettings) -> Result<HeaderMap, UpstreamError> {
    let invalid = |err: reqwest::header::InvalidHeaderValue| {
        UpstreamError::new(FailureKind::Connection, format!("invalid header value: {err}"))
    };
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&settings.accept_language).map_err(invalid)?,
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&settings.user_agent).map_err(invalid)?,
    );
    headers.insert(REFERER, HeaderValue::from_static("https://www.justwatch.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static(SITE_ORIGIN));
    headers.insert("Device-Id", HeaderValue::from_str(&device_id()).map_err(invalid)?);
    Ok(headers)
}

/// Random 22-character identifier, like the one the website stores per browser.
fn device_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    encoded.chars().take(22).collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_body, device_id, looks_like_html};
    use scanner_core::FailureKind;

    #[test]
    fn html_bodies_are_recognised() {
        assert!(looks_like_html("<!DOCTYPE html><html></html>"));
        assert!(looks_like_html("  \n<HTML><body>blocked</body></HTML>"));
        assert!(!looks_like_html("{\"data\":{}}"));
        assert!(!looks_like_html("<ht"));
    }

    #[test]
    fn first_graphql_error_message_is_surfaced() {
        let body = r#"{"errors":[{"message":"first"},{"message":"second"}],"data":null}"#;
        let err = decode_body(body).unwrap_err();
        assert_eq!(err.kind, FailureKind::Upstream);
        assert_eq!(err.message, "first");
    }

    #[test]
    fn empty_error_list_is_success() {
        let value = decode_body(r#"{"errors":[],"data":{"ok":true}}"#).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn device_id_has_browser_shape() {
        let id = device_id();
        assert_eq!(id.len(), 22);
        assert_ne!(id, device_id());
    }
}
