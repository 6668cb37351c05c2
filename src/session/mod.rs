use crate::backend::{BackendError, ReplyBackend};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

mod store;

pub use store::SessionStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("message text is empty")]
    EmptyMessage,
    #[error("a reply is already pending for this session")]
    AwaitingReply,
    #[error("no user message is awaiting a reply")]
    NothingToAnswer,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of a conversation. Immutable once created: no setters, the
/// transcript is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered transcript for one user interaction.
///
/// The transcript alternates user / assistant starting with a user message
/// (or is empty). A trailing user message means a reply is pending; that is
/// the state a failed `request_reply` leaves behind, and the only one it can
/// be retried from.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationSession {
    id: Uuid,
    transcript: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transcript: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// True when the last message is a user turn still waiting for a reply.
    pub fn awaiting_reply(&self) -> bool {
        matches!(self.transcript.last(), Some(m) if m.role() == Role::User)
    }

    pub fn append_user_message(&mut self, text: &str) -> Result<(), SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if self.awaiting_reply() {
            return Err(SessionError::AwaitingReply);
        }

        self.push(Message::user(text));
        Ok(())
    }

    /// Forwards the transcript to `backend` and appends the reply. On failure
    /// the transcript is left exactly as it was; the pending user message is
    /// not consumed, so the call can be retried.
    pub async fn request_reply(
        &mut self,
        backend: &dyn ReplyBackend,
    ) -> Result<Message, SessionError> {
        if !self.awaiting_reply() {
            return Err(SessionError::NothingToAnswer);
        }

        let reply = backend.generate(&self.transcript).await?;
        if reply.role() != Role::Assistant {
            return Err(BackendError::WrongRole(reply.role()).into());
        }

        self.push(reply.clone());
        Ok(reply)
    }

    fn push(&mut self, message: Message) {
        self.transcript.push(message);
        self.updated_at = Utc::now();
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StaticBackend;
    use async_trait::async_trait;

    struct FailingBackend;

    #[async_trait]
    impl ReplyBackend for FailingBackend {
        async fn generate(&self, _transcript: &[Message]) -> Result<Message, BackendError> {
            Err(BackendError::Generation("provider unreachable".into()))
        }
    }

    struct WrongRoleBackend;

    #[async_trait]
    impl ReplyBackend for WrongRoleBackend {
        async fn generate(&self, _transcript: &[Message]) -> Result<Message, BackendError> {
            Ok(Message::user("not a reply"))
        }
    }

    fn roles(session: &ConversationSession) -> Vec<Role> {
        session.transcript().iter().map(|m| m.role()).collect()
    }

    #[tokio::test]
    async fn transcript_alternates_starting_with_user() {
        let backend = StaticBackend::new("ok");
        let mut session = ConversationSession::new();

        for text in ["what is curing", "what is rebar", "what is mortar"] {
            session.append_user_message(text).unwrap();
            session.request_reply(&backend).await.unwrap();
        }

        assert_eq!(
            roles(&session),
            vec![
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
            ]
        );
    }

    #[test]
    fn empty_and_whitespace_input_is_rejected() {
        let mut session = ConversationSession::new();
        assert!(matches!(
            session.append_user_message(""),
            Err(SessionError::EmptyMessage)
        ));
        assert!(matches!(
            session.append_user_message("   \n\t"),
            Err(SessionError::EmptyMessage)
        ));
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn second_user_message_while_awaiting_is_rejected() {
        let mut session = ConversationSession::new();
        session.append_user_message("hello").unwrap();
        assert!(matches!(
            session.append_user_message("anyone there?"),
            Err(SessionError::AwaitingReply)
        ));
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn reply_without_pending_user_message_is_rejected() {
        let backend = StaticBackend::new("ok");
        let mut session = ConversationSession::new();

        assert!(matches!(
            session.request_reply(&backend).await,
            Err(SessionError::NothingToAnswer)
        ));

        session.append_user_message("hello").unwrap();
        session.request_reply(&backend).await.unwrap();
        assert!(matches!(
            session.request_reply(&backend).await,
            Err(SessionError::NothingToAnswer)
        ));
    }

    #[tokio::test]
    async fn successful_turn_appends_user_then_assistant() {
        let backend = StaticBackend::new("hi there");
        let mut session = ConversationSession::new();

        session.append_user_message("hello").unwrap();
        let reply = session.request_reply(&backend).await.unwrap();

        assert_eq!(reply.content(), "hi there");
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role(), Role::User);
        assert_eq!(transcript[0].content(), "hello");
        assert_eq!(transcript[1].role(), Role::Assistant);
        assert_eq!(transcript[1].content(), "hi there");
    }

    #[tokio::test]
    async fn failed_reply_leaves_transcript_unchanged() {
        let mut session = ConversationSession::new();
        session.append_user_message("hello").unwrap();

        let result = session.request_reply(&FailingBackend).await;
        assert!(matches!(
            result,
            Err(SessionError::Backend(BackendError::Generation(_)))
        ));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role(), Role::User);
        assert_eq!(transcript[0].content(), "hello");
        assert!(session.awaiting_reply());
    }

    #[tokio::test]
    async fn failed_reply_can_be_retried() {
        let mut session = ConversationSession::new();
        session.append_user_message("hello").unwrap();

        assert!(session.request_reply(&FailingBackend).await.is_err());
        let reply = session.request_reply(&StaticBackend::new("back up")).await.unwrap();

        assert_eq!(reply.content(), "back up");
        assert_eq!(session.transcript().len(), 2);
        assert!(!session.awaiting_reply());
    }

    #[tokio::test]
    async fn non_assistant_reply_is_rejected_and_not_recorded() {
        let mut session = ConversationSession::new();
        session.append_user_message("hello").unwrap();

        assert!(matches!(
            session.request_reply(&WrongRoleBackend).await,
            Err(SessionError::Backend(BackendError::WrongRole(Role::User)))
        ));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn reading_the_transcript_twice_is_identical() {
        let mut session = ConversationSession::new();
        session.append_user_message("hello").unwrap();

        let first: Vec<(Role, String)> = session
            .transcript()
            .iter()
            .map(|m| (m.role(), m.content().to_string()))
            .collect();
        let second: Vec<(Role, String)> = session
            .transcript()
            .iter()
            .map(|m| (m.role(), m.content().to_string()))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn user_message_text_is_trimmed() {
        let mut session = ConversationSession::new();
        session.append_user_message("  hello  ").unwrap();
        assert_eq!(session.transcript()[0].content(), "hello");
    }

    #[test]
    fn session_round_trips_through_json() {
        let mut session = ConversationSession::new();
        session.append_user_message("what is cement").unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: ConversationSession = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id(), session.id());
        assert_eq!(restored.transcript().len(), 1);
        assert_eq!(restored.transcript()[0].content(), "what is cement");
        assert!(restored.awaiting_reply());
    }
}
