use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{CompletionRequest, Provider, SpeechSettings};
use crate::{
    config::Config,
    dto::{ChatMessage, MessageContent, Role},
    service,
};

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: Role,
    content: OpenAIContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OpenAIContent<'a> {
    Text(&'a str),
    Parts(Vec<OpenAIContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OpenAIContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: OpenAIImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct OpenAIImageUrl<'a> {
    url: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAIMessage<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        let content = match &message.content {
            MessageContent::Text(text) => OpenAIContent::Text(text.as_str()),
            MessageContent::WithImage { text, image } => OpenAIContent::Parts(vec![
                OpenAIContentPart::Text { text: text.as_str() },
                OpenAIContentPart::ImageUrl { image_url: OpenAIImageUrl { url: image.as_str() } },
            ]),
        };
        Self { role: message.role, content }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    speed: f32,
    response_format: &'static str,
}

/// Talks to an OpenAI-compatible API over HTTP.
pub struct OpenAiProvider {
    http: reqwest::Client,
    base_url: Box<str>,
    api_key: Box<str>,
    speech: SpeechSettings,
}

impl OpenAiProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.provider_url.clone(),
            api_key: config.api_key.clone(),
            speech: config.speech.clone(),
        })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> service::Result<reqwest::Response> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(error_response(status, &body))
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> service::Result<String> {
        let body = OpenAIRequest {
            model: &request.model,
            messages: request.messages.iter().map(OpenAIMessage::from).collect(),
            max_tokens: request.max_tokens,
        };
        tracing::debug!(model = body.model, messages = body.messages.len(), "Requesting completion");

        let response_text = self
            .post("/v1/chat/completions", &body)
            .await?
            .text()
            .await
            .map_err(transport_error)?;

        let response: OpenAIResponse = serde_json::from_str(&response_text).map_err(|error| {
            tracing::error!("Unparseable completion response: {}", error);
            service::Error::InvalidResponse
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| service::Error::Provider(Some("The model returned an empty answer".into())))
    }

    async fn speak(&self, text: &str) -> service::Result<Bytes> {
        if text.trim().is_empty() {
            return Err(service::Error::Provider(Some("Nothing to narrate".into())));
        }

        let body = SpeechRequest {
            model: &self.speech.model,
            voice: &self.speech.voice,
            input: text,
            speed: self.speech.speed,
            response_format: "mp3",
        };
        tracing::debug!(model = body.model, voice = body.voice, chars = text.len(), "Requesting speech");

        let audio = self
            .post("/v1/audio/speech", &body)
            .await?
            .bytes()
            .await
            .map_err(transport_error)?;

        if audio.is_empty() {
            tracing::error!("Speech synthesis returned no audio");
            return Err(service::Error::Provider(Some("Speech synthesis returned no audio".into())));
        }
        Ok(audio)
    }
}

fn transport_error(error: reqwest::Error) -> service::Error {
    if error.is_timeout() {
        tracing::error!("Provider request timed out: {}", error);
        service::Error::Timeout
    } else {
        tracing::error!("Provider request failed: {}", error);
        service::Error::Provider(None)
    }
}

fn error_response(status: StatusCode, body: &str) -> service::Error {
    let detail = serde_json::from_str::<OpenAIError>(body)
        .ok()
        .map(|error| error.error.message)
        .filter(|message| !message.trim().is_empty());
    tracing::error!(%status, detail = detail.as_deref().unwrap_or(""), "Provider returned an error");
    service::Error::Provider(detail.map(Into::into))
}
