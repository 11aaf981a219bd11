// API client module: a small blocking HTTP client for the order service.
// Every call is one synchronous round trip; the caller renders the response.

use crate::error::RequestError;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

/// Base URL used when `ORDER_SERVICE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Environment variable that overrides the service base URL.
pub const BASE_URL_ENV: &str = "ORDER_SERVICE_URL";

/// Blocking client bound to one order service base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Transport record exchanged with the order service. `id` and `status`
/// are assigned by the server and left out of request bodies when unset.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Order {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub id: Option<String>,
    pub product_id: String,
    pub quantity: i64,
    #[serde(serialize_with = "finite_amount")]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub status: Option<String>,
}

impl Order {
    pub fn new(product_id: impl Into<String>, quantity: i64, amount: f64) -> Self {
        Order {
            id: None,
            product_id: product_id.into(),
            quantity,
            amount,
            status: None,
        }
    }

    /// Attach a status; an empty string means "no status".
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        self.status = if status.is_empty() { None } else { Some(status) };
        self
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

// JSON has no NaN or infinity; serde_json would write `null` for them.
fn finite_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.is_finite() {
        serializer.serialize_f64(*amount)
    } else {
        Err(serde::ser::Error::custom(format!(
            "amount {amount} is not a finite number"
        )))
    }
}

impl ApiClient {
    /// Create an ApiClient configured from `ORDER_SERVICE_URL`, falling back
    /// to `http://localhost:8080`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, &base_url))
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        ApiClient {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base URL verbatim. Nothing is escaped.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> Result<Response, RequestError> {
        self.request(Method::GET, path, None)
    }

    pub fn post(&self, path: &str, body: &Order) -> Result<Response, RequestError> {
        self.request(Method::POST, path, Some(body))
    }

    pub fn put(&self, path: &str, body: &Order) -> Result<Response, RequestError> {
        self.request(Method::PUT, path, Some(body))
    }

    pub fn delete(&self, path: &str) -> Result<Response, RequestError> {
        self.request(Method::DELETE, path, None)
    }

    /// Send one request. A body, when present, is encoded as JSON before
    /// anything touches the network, so an encode failure never sends.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Order>,
    ) -> Result<Response, RequestError> {
        let url = self.url(path);
        let mut req = self.client.request(method.clone(), &url);
        if let Some(order) = body {
            let payload = serde_json::to_vec(order).map_err(|err| {
                warn!(error = %err, "failed to encode order");
                RequestError::Encode(err)
            })?;
            req = req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(payload);
        }

        debug!(%method, %url, "sending request");
        let res = req.send().map_err(|err| {
            warn!(%method, %url, error = %err, "request failed");
            RequestError::Transport(err)
        })?;
        debug!(status = res.status().as_u16(), "response received");
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(Client::new(), base)
    }

    #[test]
    fn create_body_leaves_out_id_and_status() {
        let order = Order::new("P1", 2, 9.99);
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(json, r#"{"product_id":"P1","quantity":2,"amount":9.99}"#);
    }

    #[test]
    fn update_body_carries_status() {
        let order = Order::new("P1", 3, 10.5).with_status("shipped");
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(
            json,
            r#"{"product_id":"P1","quantity":3,"amount":10.5,"status":"shipped"}"#
        );
    }

    #[test]
    fn empty_status_is_omitted() {
        let order = Order::new("P1", 1, 1.0).with_status("");
        assert_eq!(order.status, None);
        let json = serde_json::to_string(&order).unwrap();
        assert!(!json.contains("status"));
    }

    #[test]
    fn empty_id_is_omitted() {
        let mut order = Order::new("P1", 1, 1.0);
        order.id = Some(String::new());
        let json = serde_json::to_string(&order).unwrap();
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn server_order_decodes() {
        let order: Order = serde_json::from_str(
            r#"{"id":"42","product_id":"P1","quantity":2,"amount":9.99,"status":"created"}"#,
        )
        .unwrap();
        assert_eq!(order.id.as_deref(), Some("42"));
        assert_eq!(order.status.as_deref(), Some("created"));
        assert_eq!(order.quantity, 2);
    }

    #[test]
    fn non_finite_amount_fails_to_encode() {
        let order = Order::new("P1", 1, f64::NAN);
        assert!(serde_json::to_vec(&order).is_err());
    }

    #[test]
    fn encode_failure_is_reported_before_sending() {
        // Nothing listens on the discard port; an Encode error proves no send happened.
        let api = client("http://127.0.0.1:9");
        let order = Order::new("P1", 1, f64::INFINITY);
        let err = api.post("/api/orders", &order).unwrap_err();
        assert!(matches!(err, RequestError::Encode(_)));
        assert!(err.to_string().starts_with("failed to encode request body"));
    }

    #[test]
    fn url_joins_path_verbatim() {
        let api = client("http://localhost:8080/");
        assert_eq!(api.base_url(), "http://localhost:8080");
        assert_eq!(api.url("/api/orders/42"), "http://localhost:8080/api/orders/42");
        assert_eq!(api.url("/api/orders/a b"), "http://localhost:8080/api/orders/a b");
    }
}
