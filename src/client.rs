use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    dto::{ChatMessage, ChatTextResponse, HealthResponse, QueryRequest, QueryResponse},
    service,
};

#[derive(Serialize)]
struct ChatBody<'a> {
    messages: &'a [ChatMessage],
}

/// Typed client for the proxy's HTTP surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Box<str>,
    http: Client,
    timeout: Duration,
}

/// Covers a narrated answer: one completion plus one speech call, each bounded
/// by the proxy's own provider timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(150);

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self { base_url: base_url.trim_end_matches('/').into(), http: Client::new(), timeout }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> service::Result<HealthResponse> {
        let response = self
            .http
            .get(format!("{}/api/test", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(service::Error::from_transport)?;
        json(checked(response).await?).await
    }

    pub async fn query(&self, request: &QueryRequest) -> service::Result<String> {
        let response: QueryResponse = json(self.post("/api/openai", request).await?).await?;
        Ok(response.response)
    }

    /// Narrated answer as MPEG audio.
    pub async fn chat_audio(&self, messages: &[ChatMessage]) -> service::Result<Bytes> {
        let audio = self
            .post("/api/chat", &ChatBody { messages })
            .await?
            .bytes()
            .await
            .map_err(service::Error::from_transport)?;
        if audio.is_empty() {
            return Err(service::Error::InvalidResponse);
        }
        Ok(audio)
    }

    pub async fn chat_text(&self, messages: &[ChatMessage]) -> service::Result<String> {
        let response: ChatTextResponse = json(self.post("/api/chat/text", &ChatBody { messages }).await?).await?;
        Ok(response.message)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> service::Result<reqwest::Response> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(service::Error::from_transport)?;
        checked(response).await
    }
}

async fn checked(response: reqwest::Response) -> service::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        let error = service::Error::from_status(status.as_u16(), &body);
        tracing::warn!(%status, "Request failed: {}", error);
        Err(error)
    }
}

async fn json<T: DeserializeOwned>(response: reqwest::Response) -> service::Result<T> {
    response.json::<T>().await.map_err(|error| {
        tracing::error!("Unexpected response body: {}", error);
        service::Error::InvalidResponse
    })
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{provider::testing::StubProvider, server::testing::spawn_proxy};

    async fn spawn_client(provider: StubProvider) -> ApiClient {
        let addr = spawn_proxy(Arc::new(provider)).await;
        ApiClient::new(&format!("http://{addr}/"))
    }

    fn conversation() -> Vec<ChatMessage> {
        vec![ChatMessage::system("You are a museum guide."), ChatMessage::user("Tell me about mummies")]
    }

    #[tokio::test]
    async fn talks_to_every_endpoint() {
        let client = spawn_client(StubProvider::answering("Mummies are...")).await;

        assert_eq!(client.health().await.unwrap().message, "Server is running!");

        let request = QueryRequest { query: Some("Tell me about mummies".into()), ..Default::default() };
        assert_eq!(client.query(&request).await.unwrap(), "Mummies are...");

        assert!(!client.chat_audio(&conversation()).await.unwrap().is_empty());
        assert_eq!(client.chat_text(&conversation()).await.unwrap(), "Mummies are...");
    }

    #[tokio::test]
    async fn surfaces_server_error_messages() {
        let client = spawn_client(StubProvider::answering("")).await;

        let error = client.query(&QueryRequest::default()).await.unwrap_err();
        assert!(matches!(error, service::Error::BadRequest(_)));
        assert_eq!(error.to_string(), "Query is required");
    }

    #[tokio::test]
    async fn surfaces_provider_failures() {
        let client = spawn_client(StubProvider::answering("").failing_completion("Quota exceeded")).await;

        let error = client.chat_text(&conversation()).await.unwrap_err();
        assert_eq!(error.to_string(), "Quota exceeded");
    }

    #[tokio::test]
    async fn hung_server_times_out() {
        use axum::{Router, routing::get};

        let router = Router::new().route(
            "/api/test",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "late"
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let client = ApiClient::with_timeout(&format!("http://{addr}"), Duration::from_secs(1));
        assert!(matches!(client.health().await, Err(service::Error::Timeout)));
    }

    #[tokio::test]
    async fn unreachable_server_is_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}"));
        assert!(matches!(client.health().await, Err(service::Error::ServiceUnavailable)));
    }
}
