use serde::{Deserialize, Serialize};

use crate::{prompts, service};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Message body: either plain text, or text with an attached image data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    WithImage { text: String, image: String },
}

impl MessageContent {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::WithImage { text, .. } => text,
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::WithImage { image, .. } => Some(image),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self { role: Role::System, content: MessageContent::Text(text.into()) }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, content: MessageContent::Text(text.into()) }
    }

    pub fn user_with_image(text: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::WithImage { text: text.into(), image: image.into() },
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: MessageContent::Text(text.into()) }
    }
}

/// Full conversation forwarded to the completion provider as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Checks the shape the provider relies on: at least one entry, a system
    /// entry only in first position, no blank text, images only as data URLs.
    pub fn validate(&self) -> service::Result<()> {
        if self.messages.is_empty() {
            return Err(service::Error::BadRequest("Messages must contain at least one entry".into()));
        }
        for (index, message) in self.messages.iter().enumerate() {
            if index > 0 && message.role == Role::System {
                return Err(service::Error::BadRequest("System message must come first".into()));
            }
            if message.content.text().trim().is_empty() {
                return Err(service::Error::BadRequest(
                    format!("Message {index} has empty content").into(),
                ));
            }
            if let Some(image) = message.content.image() {
                validate_image(image)?;
            }
        }
        Ok(())
    }

    pub fn has_image(&self) -> bool {
        self.messages.iter().any(|message| message.content.image().is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// A [`QueryRequest`] that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleTurnQuery {
    pub system_prompt: String,
    pub query: String,
    pub image: Option<String>,
}

impl QueryRequest {
    pub fn validate(self) -> service::Result<SingleTurnQuery> {
        let query = self
            .query
            .filter(|query| !query.trim().is_empty())
            .ok_or_else(|| service::Error::BadRequest("Query is required".into()))?;
        let image = self.image.filter(|image| !image.is_empty());
        if let Some(image) = &image {
            validate_image(image)?;
        }
        let system_prompt = self
            .system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or_else(|| prompts::DEFAULT_SYSTEM_PROMPT.to_owned());
        Ok(SingleTurnQuery { system_prompt, query, image })
    }
}

fn validate_image(image: &str) -> service::Result<()> {
    if image.starts_with("data:image/") && image.contains(";base64,") {
        Ok(())
    } else {
        Err(service::Error::BadRequest("Image must be a base64 data URL".into()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTextResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}
