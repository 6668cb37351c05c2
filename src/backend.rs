use crate::session::{Message, Role};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("response generation failed: {0}")]
    Generation(String),
    #[error("backend returned an empty reply")]
    EmptyReply,
    #[error("backend produced a {0} message instead of an assistant reply")]
    WrongRole(Role),
}

/// Narrow seam to whatever produces assistant replies: given the ordered
/// transcript, return exactly one assistant message or fail.
#[async_trait]
pub trait ReplyBackend: Send + Sync {
    async fn generate(&self, transcript: &[Message]) -> Result<Message, BackendError>;
}

/// Offline variant: always answers with a fixed text. Selected with
/// `provider = "local"`, and doubles as the success stub in tests.
pub struct StaticBackend {
    reply: String,
}

impl StaticBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ReplyBackend for StaticBackend {
    async fn generate(&self, _transcript: &[Message]) -> Result<Message, BackendError> {
        if self.reply.is_empty() {
            return Err(BackendError::EmptyReply);
        }
        Ok(Message::assistant(&self.reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_backend_replies_with_fixed_text() {
        let backend = StaticBackend::new("hi there");
        let reply = backend.generate(&[]).await.unwrap();
        assert_eq!(reply.role(), Role::Assistant);
        assert_eq!(reply.content(), "hi there");
    }

    #[tokio::test]
    async fn static_backend_rejects_empty_reply_text() {
        let backend = StaticBackend::new("");
        assert!(matches!(
            backend.generate(&[]).await,
            Err(BackendError::EmptyReply)
        ));
    }
}
