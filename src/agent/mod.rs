use crate::backend::{ReplyBackend, StaticBackend};
use crate::config::Config;
use anyhow::Result;
use rig::client::CompletionClient;
use rig::providers::{anthropic, gemini, openai};
use std::sync::Arc;

mod assistant;
mod preamble;
mod rig_backend;

pub use assistant::{Assistant, AssistantReply};
pub use preamble::OFF_TOPIC_REPLY;
use rig_backend::RigBackend;

const LOCAL_REPLY: &str =
    "I could not find that in my glossary. Please ask about a specific construction \
     material, IS code, or practice.";

pub fn create_backend(config: &Config) -> Result<Arc<dyn ReplyBackend>> {
    match config.api_provider.as_str() {
        "openai" => {
            let client: openai::CompletionsClient = openai::CompletionsClient::builder()
                .api_key(&config.api_key)
                .base_url(&config.api_url)
                .build()?;
            Ok(rig_backend(client, config))
        }
        "gemini" => {
            let client = gemini::Client::new(&config.api_key)?;
            Ok(rig_backend(client, config))
        }
        "local" => Ok(Arc::new(StaticBackend::new(LOCAL_REPLY))),
        _ => {
            let client: anthropic::Client = anthropic::Client::builder()
                .api_key(&config.api_key)
                .base_url(&config.api_url)
                .build()?;
            Ok(rig_backend(client, config))
        }
    }
}

fn rig_backend<C>(client: C, config: &Config) -> Arc<dyn ReplyBackend>
where
    C: CompletionClient,
    C::CompletionModel: 'static,
{
    let agent = client
        .agent(&config.model)
        .preamble(&preamble::persona_preamble())
        .max_tokens(config.max_reply_tokens)
        .build();
    Arc::new(RigBackend::new(agent, config.history_window))
}
