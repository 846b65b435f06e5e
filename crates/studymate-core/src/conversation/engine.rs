use super::event::{ConversationEvent, ConversationState};
use super::message::{Message, MessageRole};
use crate::error::{Result, StudyError};
use crate::prompt::PromptBook;
use crate::subject::Subject;
use tokio::sync::mpsc;

/// Identifies the single loading placeholder of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderHandle {
    message_id: String,
}

impl PlaceholderHandle {
    pub fn message_id(&self) -> &str {
        &self.message_id
    }
}

/// Ordered message list of one chat plus its request lifecycle.
///
/// `ConversationEngine` is responsible for:
/// - Seeding a conversation (date marker, system prompt, welcome message)
/// - Appending user messages and hidden follow-up prompts
/// - Tracking the one pending assistant placeholder
/// - Finalizing or removing that placeholder when the provider answers
/// - Computing the visible list and the context sent to the provider
///
/// The engine is synchronous and holds no locks; one instance belongs to one
/// session. Callers run the completion request themselves and then call
/// exactly one of [`resolve_placeholder`](Self::resolve_placeholder) or
/// [`fail_placeholder`](Self::fail_placeholder).
pub struct ConversationEngine {
    prompts: PromptBook,
    subject: Option<Subject>,
    messages: Vec<Message>,
    pending: Option<PlaceholderHandle>,
    subscribers: Vec<mpsc::UnboundedSender<ConversationEvent>>,
}

impl ConversationEngine {
    /// Creates an empty engine. Call [`initialize`](Self::initialize) before use.
    pub fn new(prompts: PromptBook) -> Self {
        Self {
            prompts,
            subject: None,
            messages: Vec::new(),
            pending: None,
            subscribers: Vec::new(),
        }
    }

    /// Seeds the conversation with a date marker, the system prompt derived
    /// from `subject`, and a visible welcome message.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if the conversation already has messages;
    /// use [`clear`](Self::clear) to start over.
    pub fn initialize(&mut self, subject: Option<Subject>) -> Result<()> {
        if !self.messages.is_empty() {
            return Err(StudyError::AlreadyInitialized);
        }

        let date_label = chrono::Local::now().format("%B %-d, %Y").to_string();
        self.messages.push(Message::date_marker(date_label));
        self.messages
            .push(Message::system(self.prompts.system_prompt(subject.as_ref())));
        self.messages
            .push(Message::assistant(self.prompts.welcome_message(subject.as_ref())));
        self.subject = subject;

        tracing::debug!(
            "Conversation initialized (subject: {:?})",
            self.subject.as_ref().map(Subject::label)
        );
        self.notify(ConversationEvent::MessagesUpdated);
        Ok(())
    }

    /// Discards every message and re-seeds with the previous subject.
    ///
    /// A pending placeholder is dropped with the rest and announced as
    /// removed; a reply that arrives for it afterwards no longer matches
    /// [`pending`](Self::pending).
    pub fn clear(&mut self) {
        self.messages.clear();
        if let Some(handle) = self.pending.take() {
            self.notify(ConversationEvent::PlaceholderRemoved {
                message_id: handle.message_id,
            });
        }
        let subject = self.subject.take();
        // Cannot fail: the message list was just emptied.
        let _ = self.initialize(subject);
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn prompts(&self) -> &PromptBook {
        &self.prompts
    }

    pub fn state(&self) -> ConversationState {
        if self.pending.is_some() {
            ConversationState::AwaitingReply
        } else {
            ConversationState::Idle
        }
    }

    /// The outstanding placeholder, if a reply is pending.
    pub fn pending(&self) -> Option<&PlaceholderHandle> {
        self.pending.as_ref()
    }

    /// Every message in insertion order, hidden and system ones included.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Appends a user message.
    ///
    /// Surrounding whitespace is trimmed. Does not contact the completion
    /// provider; send [`api_context`](Self::api_context) afterwards.
    ///
    /// # Errors
    ///
    /// - `EmptySubmission` if the text is blank and no image is attached
    /// - `RequestInFlight` if a reply is still pending
    pub fn submit_user_message(&mut self, text: &str, image_url: Option<String>) -> Result<String> {
        let text = text.trim();
        if text.is_empty() && image_url.is_none() {
            tracing::debug!("Ignoring empty submission");
            return Err(StudyError::EmptySubmission);
        }
        self.ensure_idle()?;

        let message = Message::user(text, image_url);
        let id = message.id.clone();
        self.messages.push(message);
        self.notify(ConversationEvent::MessagesUpdated);
        Ok(id)
    }

    /// Appends a hidden user prompt that is sent to the provider but never shown.
    ///
    /// # Errors
    ///
    /// Same as [`submit_user_message`](Self::submit_user_message).
    pub fn submit_hidden_prompt(&mut self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StudyError::EmptySubmission);
        }
        self.ensure_idle()?;

        let message = Message::hidden_user(text);
        let id = message.id.clone();
        self.messages.push(message);
        self.notify(ConversationEvent::MessagesUpdated);
        Ok(id)
    }

    /// Appends the loading assistant placeholder.
    ///
    /// # Errors
    ///
    /// Returns `RequestInFlight` if a placeholder already exists; no second
    /// placeholder is appended.
    pub fn add_pending_placeholder(&mut self) -> Result<PlaceholderHandle> {
        if self.pending.is_some() {
            tracing::warn!("Refusing a second placeholder while a reply is pending");
            return Err(StudyError::RequestInFlight);
        }

        let message = Message::placeholder();
        let handle = PlaceholderHandle {
            message_id: message.id.clone(),
        };
        self.messages.push(message);
        self.pending = Some(handle.clone());

        tracing::debug!("Awaiting reply for placeholder {}", handle.message_id);
        self.notify(ConversationEvent::MessagesUpdated);
        Ok(handle)
    }

    /// Finalizes the pending placeholder with the provider's reply.
    ///
    /// If nothing is pending the reply is appended as a new assistant
    /// message and a warning is logged.
    pub fn resolve_placeholder(&mut self, text: impl Into<String>) -> &Message {
        let text = text.into();
        let index = match self.take_pending_index() {
            Some(index) => {
                let message = &mut self.messages[index];
                message.content = text;
                message.is_loading = false;
                index
            }
            None => {
                tracing::warn!("Resolved a reply with no pending placeholder; appending it");
                self.messages.push(Message::assistant(text));
                self.messages.len() - 1
            }
        };

        self.notify(ConversationEvent::MessagesUpdated);
        &self.messages[index]
    }

    /// Removes the pending placeholder after a failed request and publishes
    /// `error_message` to subscribers.
    ///
    /// Returns the removed placeholder, or `None` if nothing was pending.
    pub fn fail_placeholder(&mut self, error_message: impl Into<String>) -> Option<Message> {
        let removed = self
            .take_pending_index()
            .map(|index| self.messages.remove(index));

        if let Some(message) = &removed {
            self.notify(ConversationEvent::PlaceholderRemoved {
                message_id: message.id.clone(),
            });
            self.notify(ConversationEvent::MessagesUpdated);
        }

        let message = error_message.into();
        tracing::debug!("Completion failed: {}", message);
        self.notify(ConversationEvent::Failed { message });
        removed
    }

    /// Messages a renderer shows: user, assistant and date markers that are
    /// not hidden, in insertion order.
    pub fn visible_messages(&self) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|message| {
                matches!(
                    message.role,
                    MessageRole::User | MessageRole::Assistant | MessageRole::DateMarker
                ) && !message.is_hidden
            })
            .collect()
    }

    /// Messages sent to the completion provider: user, assistant and system
    /// messages in insertion order, hidden prompts included and the loading
    /// placeholder excluded.
    pub fn api_context(&self) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|message| message.role.api_name().is_some() && !message.is_loading)
            .collect()
    }

    /// The first visible user-authored text, used as the session preview.
    pub fn first_question(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| {
                message.role == MessageRole::User
                    && !message.is_hidden
                    && !message.content.is_empty()
            })
            .map(|message| message.content.as_str())
    }

    /// True once a visible user message has been answered by a finalized reply.
    pub fn has_exchange(&self) -> bool {
        let Some(first_user) = self
            .messages
            .iter()
            .position(|message| message.role == MessageRole::User && !message.is_hidden)
        else {
            return false;
        };

        self.messages[first_user..]
            .iter()
            .any(|message| message.role == MessageRole::Assistant && !message.is_loading)
    }

    /// Registers a new subscriber for conversation events.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ConversationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.pending.is_some() {
            return Err(StudyError::RequestInFlight);
        }
        Ok(())
    }

    /// Clears the pending slot and returns its message position, if present.
    fn take_pending_index(&mut self) -> Option<usize> {
        let handle = self.pending.take()?;
        self.messages
            .iter()
            .rposition(|message| message.id == handle.message_id && message.is_loading)
    }

    fn notify(&mut self, event: ConversationEvent) {
        // Drop subscribers whose receiver is gone.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
