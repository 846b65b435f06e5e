//! Chat use case implementation.
//!
//! `ChatUseCase` drives one conversation end to end: it feeds user input into
//! the [`ConversationEngine`], runs the completion request while the engine
//! shows a loading placeholder, and writes the outcome back. Leaving the chat
//! persists a session summary through the [`SessionRepository`].

use std::sync::Arc;
use studymate_core::conversation::{ConversationEngine, ConversationEvent, PlaceholderHandle};
use studymate_core::error::Result;
use studymate_core::prompt::PromptBook;
use studymate_core::session::{Session, SessionRepository};
use studymate_core::{CompletionProvider, Message, Subject};
use tokio::sync::{Mutex, mpsc};

/// Request kinds that share the placeholder lifecycle.
enum Request {
    Chat(Vec<Message>),
    Translate { text: String, from: String, to: String },
}

/// Use case for a single chat screen.
///
/// # Concurrency
///
/// The engine lock is never held across the provider call. A reply is only
/// applied if the placeholder it was started for is still pending; a reply
/// arriving after [`clear`](Self::clear) is dropped.
pub struct ChatUseCase {
    engine: Mutex<ConversationEngine>,
    provider: Arc<dyn CompletionProvider>,
    session_repository: Arc<dyn SessionRepository>,
    /// Session persisted for this conversation, once there is one
    bound_session: Mutex<Option<Session>>,
}

impl ChatUseCase {
    pub fn new(
        prompts: PromptBook,
        provider: Arc<dyn CompletionProvider>,
        session_repository: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            engine: Mutex::new(ConversationEngine::new(prompts)),
            provider,
            session_repository,
            bound_session: Mutex::new(None),
        }
    }

    /// Seeds the conversation for `subject`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if the chat was already started.
    pub async fn start(&self, subject: Subject) -> Result<()> {
        self.engine.lock().await.initialize(Some(subject))
    }

    /// Starts the chat from a stored session and binds it, so leaving later
    /// updates that session instead of creating a new one.
    ///
    /// Returns the session's first question; the caller resubmits it with
    /// [`send`](Self::send) to replay the conversation.
    pub async fn resume(&self, session: Session) -> Result<String> {
        self.engine
            .lock()
            .await
            .initialize(Some(session.subject.clone()))?;

        tracing::info!("Resuming session {}", session.id);
        let seed = session.first_question.clone();
        *self.bound_session.lock().await = Some(session);
        Ok(seed)
    }

    /// Submits user input and waits for the assistant's reply.
    ///
    /// Returns `Ok(None)` when the conversation was cleared before the reply
    /// arrived.
    ///
    /// # Errors
    ///
    /// - `EmptySubmission` / `RequestInFlight` from the engine; nothing is sent
    /// - the provider's error, after the placeholder has been removed
    pub async fn send(&self, text: &str, image_url: Option<String>) -> Result<Option<Message>> {
        let (handle, context) = {
            let mut engine = self.engine.lock().await;
            engine.submit_user_message(text, image_url)?;
            let handle = engine.add_pending_placeholder()?;
            (handle, owned_context(&engine))
        };
        self.complete(handle, Request::Chat(context)).await
    }

    /// Asks the model to elaborate on its previous answer with the hidden
    /// explain-further prompt.
    pub async fn explain_further(&self) -> Result<Option<Message>> {
        let (handle, context) = {
            let mut engine = self.engine.lock().await;
            let prompt = engine.prompts().explain_further.clone();
            engine.submit_hidden_prompt(&prompt)?;
            let handle = engine.add_pending_placeholder()?;
            (handle, owned_context(&engine))
        };
        self.complete(handle, Request::Chat(context)).await
    }

    /// Translates `text` from `from` to `to`, showing the text as a user
    /// message and the translation as the reply.
    pub async fn translate(&self, text: &str, from: &str, to: &str) -> Result<Option<Message>> {
        let handle = {
            let mut engine = self.engine.lock().await;
            engine.submit_user_message(text, None)?;
            engine.add_pending_placeholder()?
        };
        let request = Request::Translate {
            text: text.trim().to_string(),
            from: from.to_string(),
            to: to.to_string(),
        };
        self.complete(handle, request).await
    }

    /// Persists the conversation summary when the user leaves the chat.
    ///
    /// Nothing is stored until the chat has at least one answered question.
    /// The first visit creates the session; later visits only update its
    /// first question when it changed.
    pub async fn leave(&self) -> Result<Option<Session>> {
        let (subject, first_question) = {
            let engine = self.engine.lock().await;
            if !engine.has_exchange() {
                tracing::debug!("Leaving chat without an exchange; nothing to save");
                return Ok(None);
            }
            (
                engine.subject().cloned().unwrap_or_default(),
                engine.first_question().unwrap_or_default().to_string(),
            )
        };

        let mut bound = self.bound_session.lock().await;
        match bound.as_mut() {
            None => {
                let session = Session::new(subject, first_question);
                self.session_repository
                    .create(&session)
                    .await
                    .inspect_err(|e| tracing::error!("Failed to save session: {}", e))?;
                *bound = Some(session.clone());
                Ok(Some(session))
            }
            Some(session) if session.first_question != first_question => {
                self.session_repository
                    .update_first_question(&session.id, &first_question)
                    .await
                    .inspect_err(|e| {
                        tracing::error!("Failed to update session {}: {}", session.id, e)
                    })?;
                session.first_question = first_question;
                Ok(Some(session.clone()))
            }
            Some(session) => Ok(Some(session.clone())),
        }
    }

    /// Discards the conversation and seeds it again with the same subject.
    pub async fn clear(&self) {
        self.engine.lock().await.clear();
    }

    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<ConversationEvent> {
        self.engine.lock().await.subscribe()
    }

    /// Snapshot of the messages a renderer shows.
    pub async fn visible_messages(&self) -> Vec<Message> {
        self.engine
            .lock()
            .await
            .visible_messages()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn subject(&self) -> Option<Subject> {
        self.engine.lock().await.subject().cloned()
    }

    pub async fn bound_session(&self) -> Option<Session> {
        self.bound_session.lock().await.clone()
    }

    async fn complete(&self, handle: PlaceholderHandle, request: Request) -> Result<Option<Message>> {
        let outcome = match &request {
            Request::Chat(context) => self.provider.send_chat(context).await,
            Request::Translate { text, from, to } => {
                self.provider.translate_text(text, from, to).await
            }
        };

        let mut engine = self.engine.lock().await;
        if engine.pending() != Some(&handle) {
            tracing::debug!(
                "Dropping reply for placeholder {} that is no longer pending",
                handle.message_id()
            );
            return Ok(None);
        }

        match outcome {
            Ok(reply) => Ok(Some(engine.resolve_placeholder(reply).clone())),
            Err(e) => {
                engine.fail_placeholder(e.user_message());
                Err(e)
            }
        }
    }
}

fn owned_context(engine: &ConversationEngine) -> Vec<Message> {
    engine.api_context().into_iter().cloned().collect()
}
