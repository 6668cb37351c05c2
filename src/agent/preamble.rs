use crate::session::{Message, Role};
use std::fmt::Write;

pub const OFF_TOPIC_REPLY: &str = "Sorry, I only answer construction-related questions.";

const PERSONA: &str = "You are a civil engineering expert.\n\
                       Answer clearly and only about construction materials, IS codes, and civil \
                       engineering practice.\n\
                       Keep answers short and concrete.\n";

pub fn persona_preamble() -> String {
    format!("{PERSONA}If the question is irrelevant, reply: \"{OFF_TOPIC_REPLY}\"")
}

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
    }
}

/// Renders one completion call: the last `window` completed turns as chat
/// history, then the pending user line. The transcript must end with a user
/// message.
pub fn build_prompt(transcript: &[Message], window: usize) -> String {
    let Some((current, history)) = transcript.split_last() else {
        return String::new();
    };

    let tail = history.len().saturating_sub(window * 2);
    let history = &history[tail..];

    let mut prompt = String::with_capacity(
        history.iter().map(|m| m.content().len() + 16).sum::<usize>()
            + current.content().len()
            + 32,
    );

    if !history.is_empty() {
        prompt.push_str("Chat history:\n");
        for message in history {
            let _ = writeln!(prompt, "{}: {}", label(message.role()), message.content());
        }
        prompt.push('\n');
    }

    let _ = write!(prompt, "User: {}", current.content());
    prompt
}
