//! Turn -> Chat Completions request mapping, plus thread assignment.
//!
//! Reference: <https://platform.openai.com/docs/api-reference/chat/create>

use mountain_types::ConversationTurn;
use serde::{Deserialize, Serialize};

/// Thread id a client sends to start a new conversation.
pub const NEW_THREAD: &str = "new";

/// A configured assistant profile.
///
/// Selected by matching [`ConversationTurn::assistant_id`] against `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assistant {
    /// Identifier clients send as `assistant_id`.
    pub id: String,
    /// Model override; the provider's default model when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// System prompt sent ahead of the user's message.
    #[serde(default)]
    pub instructions: String,
}

/// Build the streaming request body for one turn.
pub(crate) fn to_api_request(
    turn: &ConversationTurn,
    assistant: Option<&Assistant>,
    default_model: &str,
) -> serde_json::Value {
    let model = assistant
        .and_then(|a| a.model.as_deref())
        .unwrap_or(default_model);

    let mut messages = Vec::with_capacity(2);
    if let Some(assistant) = assistant.filter(|a| !a.instructions.is_empty()) {
        messages.push(serde_json::json!({
            "role": "system",
            "content": assistant.instructions,
        }));
    }
    messages.push(serde_json::json!({
        "role": "user",
        "content": turn.user_input,
    }));

    serde_json::json!({
        "model": model,
        "messages": messages,
        "stream": true,
    })
}

/// Resolve the thread a turn continues.
///
/// Returns the id to report and whether it was freshly minted.
pub(crate) fn assign_thread(requested: &str) -> (String, bool) {
    if requested == NEW_THREAD {
        (format!("thrd_{}", uuid::Uuid::new_v4().simple()), true)
    } else {
        (requested.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tutor() -> Assistant {
        Assistant {
            id: "asst_tutor".into(),
            model: Some("gpt-4o".into()),
            instructions: "You are a patient tutor.".into(),
        }
    }

    #[test]
    fn plain_turn_is_single_user_message() {
        let turn = ConversationTurn::new("Hello", "thrd_1", "asst_x");
        let body = to_api_request(&turn, None, "gpt-4o-mini");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], true);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Hello");
    }

    #[test]
    fn assistant_adds_system_prompt_and_model() {
        let turn = ConversationTurn::new("Explain borrowing", "thrd_1", "asst_tutor");
        let body = to_api_request(&turn, Some(&tutor()), "gpt-4o-mini");

        assert_eq!(body["model"], "gpt-4o");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are a patient tutor.");
        assert_eq!(messages[1]["content"], "Explain borrowing");
    }

    #[test]
    fn assistant_without_model_uses_default() {
        let assistant = Assistant {
            model: None,
            ..tutor()
        };
        let turn = ConversationTurn::new("hi", "t", "asst_tutor");
        let body = to_api_request(&turn, Some(&assistant), "gpt-4o-mini");
        assert_eq!(body["model"], "gpt-4o-mini");
    }

    #[test]
    fn empty_instructions_skip_system_message() {
        let assistant = Assistant {
            instructions: String::new(),
            ..tutor()
        };
        let turn = ConversationTurn::new("hi", "t", "asst_tutor");
        let body = to_api_request(&turn, Some(&assistant), "gpt-4o-mini");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn new_thread_is_minted() {
        let (first, minted) = assign_thread("new");
        assert!(minted);
        assert!(first.starts_with("thrd_"));
        assert_eq!(first.len(), "thrd_".len() + 32);

        let (second, _) = assign_thread("new");
        assert_ne!(first, second);
    }

    #[test]
    fn existing_thread_is_kept() {
        assert_eq!(assign_thread("thrd_abc"), ("thrd_abc".to_string(), false));
    }

    #[test]
    fn assistant_deserializes_with_defaults() {
        let assistant: Assistant = serde_json::from_str(r#"{"id":"asst_1"}"#).unwrap();
        assert_eq!(assistant.id, "asst_1");
        assert_eq!(assistant.model, None);
        assert!(assistant.instructions.is_empty());
    }
}
