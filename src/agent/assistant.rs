use super::preamble::OFF_TOPIC_REPLY;
use crate::backend::{ReplyBackend, StaticBackend};
use crate::config::Config;
use crate::glossary::Glossary;
use crate::session::{ConversationSession, Message, Role, SessionError};
use crate::spell::SpellCorrector;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct AssistantReply {
    pub message: Message,
    /// Spell-corrected input when it differs from what the user typed, for a
    /// "did you mean" hint.
    pub corrected: Option<String>,
}

/// Per-turn pipeline: spell-correct, append the user message, then answer
/// from the cheapest source that applies. Off-topic questions and direct
/// glossary hits never reach the LLM backend.
pub struct Assistant {
    glossary: Glossary,
    spell: Option<SpellCorrector>,
    backend: Arc<dyn ReplyBackend>,
}

impl Assistant {
    pub fn new(config: &Config, glossary: Glossary, backend: Arc<dyn ReplyBackend>) -> Arc<Self> {
        let spell = config
            .spell_correction
            .then(|| SpellCorrector::from_glossary(&glossary));
        Arc::new(Self {
            glossary,
            spell,
            backend,
        })
    }

    pub async fn respond(
        &self,
        session: &mut ConversationSession,
        input: &str,
    ) -> Result<AssistantReply, SessionError> {
        let corrected = self
            .spell
            .as_ref()
            .and_then(|spell| spell.correct(input.trim()));
        let effective = corrected.as_deref().unwrap_or(input).to_string();

        session.append_user_message(input)?;
        let message = self.reply_to_pending(session, &effective).await?;

        Ok(AssistantReply { message, corrected })
    }

    /// Retry generation for a turn whose first attempt failed and left the
    /// session awaiting a reply.
    pub async fn retry_reply(
        &self,
        session: &mut ConversationSession,
    ) -> Result<Message, SessionError> {
        let pending = match session.transcript().last() {
            Some(m) if m.role() == Role::User => m.content().to_string(),
            _ => return Err(SessionError::NothingToAnswer),
        };
        let effective = self
            .spell
            .as_ref()
            .and_then(|spell| spell.correct(&pending))
            .unwrap_or(pending);

        self.reply_to_pending(session, &effective).await
    }

    async fn reply_to_pending(
        &self,
        session: &mut ConversationSession,
        effective: &str,
    ) -> Result<Message, SessionError> {
        if !self.glossary.is_related(effective) {
            debug!("Off-topic question, answering with the refusal reply");
            return session
                .request_reply(&StaticBackend::new(OFF_TOPIC_REPLY))
                .await;
        }

        if let Some(definition) = self.glossary.lookup(effective) {
            debug!("Glossary hit, answering locally");
            return session.request_reply(&StaticBackend::new(definition)).await;
        }

        session.request_reply(self.backend.as_ref()).await
    }
}
