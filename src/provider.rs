use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    dto::{ChatMessage, ChatRequest, SingleTurnQuery},
    service,
};

mod openai;
pub use openai::OpenAiProvider;

/// Models to pick from depending on whether the request carries an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub text: Box<str>,
    pub vision: Box<str>,
}

impl ModelSelection {
    pub fn pick(&self, has_image: bool) -> &str {
        if has_image { &*self.vision } else { &*self.text }
    }
}

/// Narration voice. The defaults are tuned for children: a warm voice,
/// played slightly slower than normal.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSettings {
    pub model: Box<str>,
    pub voice: Box<str>,
    pub speed: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self { model: "tts-1-hd".into(), voice: "nova".into(), speed: 0.9 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: Box<str>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn single_turn(query: SingleTurnQuery, models: &ModelSelection, max_tokens: u32) -> Self {
        let SingleTurnQuery { system_prompt, query, image } = query;
        let model = models.pick(image.is_some()).into();
        let user = match image {
            Some(image) => ChatMessage::user_with_image(query, image),
            None => ChatMessage::user(query),
        };
        Self {
            model,
            messages: vec![ChatMessage::system(system_prompt), user],
            max_tokens: Some(max_tokens),
        }
    }

    /// Forwards the conversation untouched; the caller supplies its own system prompt.
    pub fn conversation(request: ChatRequest, models: &ModelSelection) -> Self {
        Self {
            model: models.pick(request.has_image()).into(),
            messages: request.messages,
            max_tokens: None,
        }
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> service::Result<String>;

    /// Must fail rather than return an empty stream.
    async fn speak(&self, text: &str) -> service::Result<Bytes>;
}
