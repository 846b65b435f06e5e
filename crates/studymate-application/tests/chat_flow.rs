//! End-to-end chat flow against the TOML session store.

use async_trait::async_trait;
use std::sync::Arc;
use studymate_application::{ChatUseCase, HistoryUseCase};
use studymate_core::conversation::MessageRole;
use studymate_core::prompt::PromptBook;
use studymate_core::session::DateLabel;
use studymate_core::{CompletionProvider, Message, Result, Segment, Subject};
use studymate_infrastructure::TomlSessionRepository;
use tempfile::TempDir;

/// Answers every question with a formula.
struct FormulaTutor;

#[async_trait]
impl CompletionProvider for FormulaTutor {
    async fn send_chat(&self, messages: &[Message]) -> Result<String> {
        let question = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(format!("For {question} use \\(a^2 + b^2 = c^2\\) here."))
    }

    async fn translate_text(&self, text: &str, _from: &str, to: &str) -> Result<String> {
        Ok(format!("[{to}] {text}"))
    }
}

#[tokio::test]
async fn test_chat_is_saved_listed_and_resumed() {
    let temp_dir = TempDir::new().unwrap();
    let repository = Arc::new(TomlSessionRepository::new(temp_dir.path()).await.unwrap());
    let provider = Arc::new(FormulaTutor);

    let chat = ChatUseCase::new(PromptBook::default(), provider.clone(), repository.clone());
    chat.start(Subject::topic("Geometry")).await.unwrap();
    let reply = chat.send("right triangles", None).await.unwrap().unwrap();

    assert_eq!(
        reply.segments(),
        vec![
            Segment::text("For right triangles use"),
            Segment::formula("a^2 + b^2 = c^2", true),
            Segment::text("here."),
        ]
    );

    let saved = chat.leave().await.unwrap().unwrap();

    let history = HistoryUseCase::new(repository.clone());
    let listed = history.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0, saved);
    assert_eq!(listed[0].1, DateLabel::Today);

    // Resume in a fresh chat and replay the first question.
    let resumed = ChatUseCase::new(PromptBook::default(), provider, repository.clone());
    let seed = resumed.resume(history.find(&saved.id).await.unwrap()).await.unwrap();
    resumed.send(&seed, None).await.unwrap();
    let again = resumed.leave().await.unwrap().unwrap();

    assert_eq!(again.id, saved.id);
    assert_eq!(history.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_translate_chat_is_saved_with_translate_subject() {
    let temp_dir = TempDir::new().unwrap();
    let repository = Arc::new(TomlSessionRepository::new(temp_dir.path()).await.unwrap());

    let chat = ChatUseCase::new(PromptBook::default(), Arc::new(FormulaTutor), repository.clone());
    chat.start(Subject::Translate).await.unwrap();
    let reply = chat.translate("good morning", "English", "French").await.unwrap().unwrap();
    assert_eq!(reply.content, "[French] good morning");

    let saved = chat.leave().await.unwrap().unwrap();
    assert_eq!(saved.subject, Subject::Translate);

    let history = HistoryUseCase::new(repository);
    history.delete(&saved.id).await.unwrap();
    assert!(history.list().await.unwrap().is_empty());
}
