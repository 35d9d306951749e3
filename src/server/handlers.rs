use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use super::{AppState, extract::ApiPayload};
use crate::{
    dto::{ChatRequest, ChatTextResponse, HealthResponse, QueryRequest, QueryResponse},
    provider::CompletionRequest,
    service,
};

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { message: "Server is running!".into() })
}

pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    ApiPayload(request): ApiPayload<QueryRequest>,
) -> service::Result<Json<QueryResponse>> {
    let query = request.validate().inspect_err(|error| tracing::warn!("Rejected query: {}", error))?;
    let has_image = query.image.is_some();
    let completion = CompletionRequest::single_turn(query, &state.config.models, state.config.query_max_tokens);
    tracing::info!(has_image, model = &*completion.model, "Answering single-turn query");

    let response = state.provider.complete(completion).await?;
    Ok(Json(QueryResponse { response }))
}

pub async fn chat_audio_handler(
    State(state): State<Arc<AppState>>,
    ApiPayload(request): ApiPayload<ChatRequest>,
) -> service::Result<Response> {
    let text = complete_conversation(&state, request).await?;
    let audio = state.provider.speak(&text).await?;
    tracing::info!(bytes = audio.len(), "Narrated answer");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
            (header::CONTENT_LENGTH, HeaderValue::from(audio.len())),
        ],
        audio,
    )
        .into_response())
}

pub async fn chat_text_handler(
    State(state): State<Arc<AppState>>,
    ApiPayload(request): ApiPayload<ChatRequest>,
) -> service::Result<Json<ChatTextResponse>> {
    let message = complete_conversation(&state, request).await?;
    Ok(Json(ChatTextResponse { message }))
}

async fn complete_conversation(state: &AppState, request: ChatRequest) -> service::Result<String> {
    request.validate().inspect_err(|error| tracing::warn!("Rejected chat: {}", error))?;
    let completion = CompletionRequest::conversation(request, &state.config.models);
    tracing::info!(messages = completion.messages.len(), model = &*completion.model, "Answering chat");
    state.provider.complete(completion).await
}
