use super::error::SendError;
use async_trait::async_trait;
use futures::future::{Either, select};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "userKey")]
    pub user_key: String,
}

/// Raw status and body, before any interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointReply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err.to_string())
    }
}

/// One POST to the chat endpoint. Implementations make exactly one attempt.
#[async_trait(?Send)]
pub trait ChatTransport {
    async fn post(
        &self,
        endpoint: &str,
        request: &ChatRequest,
    ) -> Result<EndpointReply, TransportError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ChatTransport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        request: &ChatRequest,
    ) -> Result<EndpointReply, TransportError> {
        let response = self.client.post(endpoint).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(EndpointReply { status, body })
    }
}

#[derive(Deserialize)]
struct ReplyBody {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Turn a raw endpoint reply into the assistant text or a failure.
pub fn interpret_reply(reply: &EndpointReply) -> Result<String, SendError> {
    let parsed = serde_json::from_str::<ReplyBody>(&reply.body).ok();

    if !(200..300).contains(&reply.status) {
        let detail = parsed
            .and_then(|body| body.error)
            .filter(|detail| !detail.trim().is_empty());
        return Err(SendError::Http {
            status: reply.status,
            detail,
        });
    }

    parsed
        .and_then(|body| body.reply)
        .filter(|text| !text.trim().is_empty())
        .ok_or(SendError::MalformedResponse)
}

/// Race `fut` against a timer; `None` means the deadline won and `fut` was dropped.
pub async fn with_deadline<F: Future>(fut: F, limit: Duration) -> Option<F::Output> {
    let fut = pin!(fut);
    let timer = pin!(sleep(limit));
    match select(fut, timer).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(_) => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}
