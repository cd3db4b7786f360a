//! HTTP client for the WhatsApp Web bridge
//!
//! The bridge process owns the browser session (pairing, authentication,
//! delivery). We only ask it to act on our behalf.

use super::GatewayError;
use crate::runtime::MessageGateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `MessageGateway` backed by the bridge's HTTP API
#[derive(Clone)]
pub struct BridgeGateway {
    client: Client,
    base_url: String,
}

impl BridgeGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<(), GatewayError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        check_status(response).await.map(|_| ())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::rejected(format!("HTTP {status}: {body}")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    chat_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ContactResponse {
    #[serde(default)]
    pushname: Option<String>,
}

#[async_trait]
impl MessageGateway for BridgeGateway {
    async fn send_text(&self, contact_id: &str, text: &str) -> Result<(), GatewayError> {
        self.post(
            "/send",
            &ChatRequest {
                chat_id: contact_id,
                text: Some(text),
            },
        )
        .await
    }

    async fn send_typing(&self, contact_id: &str) -> Result<(), GatewayError> {
        self.post(
            "/typing",
            &ChatRequest {
                chat_id: contact_id,
                text: None,
            },
        )
        .await
    }

    async fn pin_chat(&self, contact_id: &str) -> Result<(), GatewayError> {
        self.post(
            "/pin",
            &ChatRequest {
                chat_id: contact_id,
                text: None,
            },
        )
        .await
    }

    async fn display_name(&self, contact_id: &str) -> Result<Option<String>, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/contacts/{contact_id}")))
            .send()
            .await?;
        let contact: ContactResponse = check_status(response).await?.json().await?;
        Ok(contact.pushname.filter(|name| !name.trim().is_empty()))
    }

    async fn health(&self) -> Result<(), GatewayError> {
        let response = self.client.get(self.url("/health")).send().await?;
        check_status(response).await.map(|_| ())
    }

    async fn reconnect(&self) -> Result<(), GatewayError> {
        self.post("/reconnect", &serde_json::json!({})).await
    }
}
