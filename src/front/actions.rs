use super::{audio::AudioClip, session::Answer};
use crate::{
    client::ApiClient,
    dto::{ChatMessage, QueryRequest},
    prompts::{CAMERA_PROMPT, CAMERA_SYSTEM_PROMPT, MUSEUM_GUIDE_PROMPT},
    service,
};

pub fn guide_conversation(question: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(MUSEUM_GUIDE_PROMPT), ChatMessage::user(question)]
}

/// Narrated answer: the audio is fetched first, then the text for the same
/// conversation. Either failure fails the answer.
pub async fn ask_guide(client: &ApiClient, question: &str) -> service::Result<Answer> {
    let messages = guide_conversation(question);
    let audio = client.chat_audio(&messages).await?;
    let text = client.chat_text(&messages).await?;
    Ok(Answer::narrated(text, AudioClip::new(audio)))
}

pub fn photo_request(image: String) -> QueryRequest {
    QueryRequest {
        query: Some(CAMERA_PROMPT.to_owned()),
        image: Some(image),
        system_prompt: Some(CAMERA_SYSTEM_PROMPT.to_owned()),
    }
}

pub async fn describe_photo(client: &ApiClient, image: String) -> service::Result<Answer> {
    let text = client.query(&photo_request(image)).await?;
    Ok(Answer::text(text))
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dto::{MessageContent, Role},
        provider::testing::StubProvider,
        server::testing::spawn_proxy,
    };

    const PHOTO: &str = "data:image/jpeg;base64,/9j/4AAQ";

    async fn client_for(provider: &Arc<StubProvider>) -> ApiClient {
        let addr = spawn_proxy(provider.clone()).await;
        ApiClient::new(&format!("http://{addr}"))
    }

    #[tokio::test]
    async fn narrated_answer_carries_text_and_audio() {
        let provider = Arc::new(StubProvider::answering("Mummies are..."));
        let client = client_for(&provider).await;

        let answer = ask_guide(&client, "Tell me about mummies").await.unwrap();
        assert_eq!(answer.text, "Mummies are...");
        assert_eq!(answer.audio.map(|clip| clip.len()), Some(provider.audio.len()));

        let completions = provider.completions();
        assert_eq!(completions.len(), 2);
        assert_eq!(completions[0].messages, completions[1].messages);
        assert_eq!(completions[0].messages[0].role, Role::System);
        assert_eq!(completions[0].messages[1].content.text(), "Tell me about mummies");
    }

    #[tokio::test]
    async fn speech_failure_fails_the_answer() {
        let provider = Arc::new(StubProvider::answering("Mummies are...").failing_speech());
        let client = client_for(&provider).await;

        let error = ask_guide(&client, "Tell me about mummies").await.unwrap_err();
        assert_eq!(error.to_string(), "Speech synthesis failed");
    }

    #[tokio::test]
    async fn photo_goes_to_vision_model_with_camera_prompts() {
        let provider = Arc::new(StubProvider::answering("A golden mask!"));
        let client = client_for(&provider).await;

        let answer = describe_photo(&client, PHOTO.to_owned()).await.unwrap();
        assert_eq!(answer, Answer::text("A golden mask!"));

        let completions = provider.completions();
        let request = &completions[0];
        assert_eq!(&*request.model, "gpt-4o");
        assert_eq!(request.messages[0].content.text(), CAMERA_SYSTEM_PROMPT);
        assert!(matches!(
            &request.messages[1].content,
            MessageContent::WithImage { image, .. } if image == PHOTO
        ));
    }
}
