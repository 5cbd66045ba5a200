//! Typed HTTP client for the order API.
//!
//! Used by `drinks2u-cli` and the live-listener tests. Non-2xx answers are
//! decoded from the API's `{"error", "code"}` body so callers can show the
//! server's message unchanged.
use crate::api::types::{DeleteResponse, ErrorResponse, HealthStatus, MenuResponse};
use crate::model::{Order, OrderRequest};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with an error body.
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport { .. } => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

#[derive(Clone)]
pub struct OrdersClient {
    http: reqwest::Client,
    base_url: String,
}

impl OrdersClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| ClientError::Transport {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.send(self.http.get(self.url("/api/health"))).await
    }

    pub async fn beverages(&self) -> Result<Vec<String>, ClientError> {
        let menu: MenuResponse = self.send(self.http.get(self.url("/api/beverages"))).await?;
        Ok(menu.items)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, ClientError> {
        self.send(self.http.get(self.url("/api/orders"))).await
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, ClientError> {
        self.send(self.http.get(self.url(&format!("/api/orders/{id}"))))
            .await
    }

    pub async fn create_order(&self, request: &OrderRequest) -> Result<Order, ClientError> {
        self.send(self.http.post(self.url("/api/orders")).json(request))
            .await
    }

    /// Send `status` as given; the server decides whether it is valid.
    pub async fn update_status(&self, id: i64, status: &str) -> Result<Order, ClientError> {
        let url = self.url(&format!("/api/orders/{id}/status"));
        self.send(self.http.patch(url).json(&StatusBody { status }))
            .await
    }

    pub async fn delete_order(&self, id: i64) -> Result<String, ClientError> {
        let response: DeleteResponse = self
            .send(self.http.delete(self.url(&format!("/api/orders/{id}"))))
            .await?;
        Ok(response.message)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(transport);
        }
        let url = response.url().to_string();
        let bytes = response.bytes().await.map_err(transport)?;
        Err(match serde_json::from_slice::<ErrorResponse>(&bytes) {
            Ok(body) => ClientError::Api {
                status: status.as_u16(),
                code: body.code,
                message: body.error,
            },
            Err(_) => ClientError::Api {
                status: status.as_u16(),
                code: "unknown".to_string(),
                message: format!("{url} answered {status}"),
            },
        })
    }
}

fn transport(source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        url: source
            .url()
            .map(|url| url.to_string())
            .unwrap_or_default(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OrdersClient::with_http(reqwest::Client::new(), "http://localhost:3001//");
        assert_eq!(client.url("/api/orders"), "http://localhost:3001/api/orders");
    }

    #[test]
    fn api_error_displays_server_message() {
        let err = ClientError::Api {
            status: 400,
            code: "invalid_status".to_string(),
            message: "Invalid status".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid status");
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = OrdersClient::new(&format!("http://{addr}")).expect("client");
        let err = client.list_orders().await.expect_err("no server");
        assert!(matches!(err, ClientError::Transport { .. }));
        assert_eq!(err.status(), None);
    }
}
