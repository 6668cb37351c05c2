use super::preamble;
use crate::backend::{BackendError, ReplyBackend};
use crate::session::Message;
use async_trait::async_trait;
use rig::agent::Agent;
use rig::completion::{CompletionModel, Prompt};
use tracing::debug;

/// `ReplyBackend` over a rig agent. The persona preamble and token cap are
/// installed on the agent at construction; each call sends the windowed
/// chat history plus the pending user line.
pub struct RigBackend<M: CompletionModel> {
    agent: Agent<M>,
    history_window: usize,
}

impl<M: CompletionModel> RigBackend<M> {
    pub fn new(agent: Agent<M>, history_window: usize) -> Self {
        Self {
            agent,
            history_window,
        }
    }
}

#[async_trait]
impl<M: CompletionModel> ReplyBackend for RigBackend<M> {
    async fn generate(&self, transcript: &[Message]) -> Result<Message, BackendError> {
        let prompt = preamble::build_prompt(transcript, self.history_window);
        debug!(chars = prompt.len(), "Sending completion request");

        let response = self
            .agent
            .prompt(prompt)
            .await
            .map_err(|e| BackendError::Generation(e.to_string()))?;

        let text = response.trim();
        if text.is_empty() {
            return Err(BackendError::EmptyReply);
        }

        Ok(Message::assistant(text))
    }
}
