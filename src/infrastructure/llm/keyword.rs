//! Offline chat model answering from a fixed keyword table

use async_trait::async_trait;

use crate::domain::{last_user_content, ChatModel, DomainError, Message};

const GREETING_REPLY: &str = "Hello! I'm an intelligent assistant built with CloudWeGo Eino framework. \
I can help you understand how to build LLM applications with proper architecture.";

const FRAMEWORK_REPLY: &str = "CloudWeGo Eino is a powerful LLM application development framework written in Go. It provides:\n\
• Component abstractions for LLM applications\n\
• Type-safe composition framework\n\
• Stream processing capabilities\n\
• Built-in support for tool calling\n\
• Production-ready architecture patterns";

const MODEL_REPLY: &str = "Eino's model component provides a standardized interface for LLM interactions. It supports:\n\
• BaseChatModel interface for basic chat operations\n\
• ToolCallingChatModel for function calling\n\
• Stream processing for real-time responses\n\
• Proper error handling and type safety";

const CHAIN_REPLY: &str = "Eino's composition framework allows building complex LLM workflows:\n\
• Chains for linear processing\n\
• Graphs for complex workflows\n\
• Workflows for structured data processing\n\
• All with full type safety and error handling";

const HOW_IT_WORKS_REPLY: &str = "Eino works by providing a structured framework for LLM application development:\n\
1. Define components (models, prompts, tools)\n\
2. Compose them using chains or graphs\n\
3. Execute with proper error handling\n\
4. Process streams for real-time applications";

const DEFAULT_REPLY: &str = "I'm an assistant demonstrating CloudWeGo Eino framework capabilities. \
I can help you understand how to build production-ready LLM applications with proper architecture, \
type safety, and streaming capabilities. What would you like to know about Eino framework?";

/// Stand-in for a real model: replies to the most recent user turn by keyword
#[derive(Debug, Default, Clone)]
pub struct KeywordChatModel;

impl KeywordChatModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatModel for KeywordChatModel {
    async fn generate(&self, history: &[Message]) -> Result<Message, DomainError> {
        let input = last_user_content(history).unwrap_or_default();
        Ok(Message::assistant(reply_for(input)))
    }

    fn name(&self) -> &str {
        "keyword-mock"
    }
}

/// First matching rule wins; matching is case-insensitive substring search
fn reply_for(input: &str) -> &'static str {
    let lower = input.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("hello") || has("hi") {
        GREETING_REPLY
    } else if has("eino") || has("cloudwego") {
        FRAMEWORK_REPLY
    } else if has("model") || has("llm") {
        MODEL_REPLY
    } else if has("chain") || has("composition") {
        CHAIN_REPLY
    } else if has("how") && has("work") {
        HOW_IT_WORKS_REPLY
    } else {
        DEFAULT_REPLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageRole;

    #[test]
    fn test_keyword_table() {
        assert_eq!(reply_for("Hello there"), GREETING_REPLY);
        assert_eq!(reply_for("what is eino"), FRAMEWORK_REPLY);
        assert_eq!(reply_for("Tell me about CloudWeGo"), FRAMEWORK_REPLY);
        assert_eq!(reply_for("which LLM?"), GREETING_REPLY);
        assert_eq!(reply_for("explain composition"), CHAIN_REPLY);
        assert_eq!(reply_for("how does it work"), HOW_IT_WORKS_REPLY);
        assert_eq!(reply_for("tell me a joke"), DEFAULT_REPLY);
        assert_eq!(reply_for(""), DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn test_last_user_turn_wins() {
        let model = KeywordChatModel::new();
        let history = vec![
            Message::system("You are helpful."),
            Message::user("what is eino"),
            Message::assistant("earlier answer"),
            Message::user("hello"),
            Message::system("trailing instruction about llm"),
        ];

        let reply = model.generate(&history).await.unwrap();

        assert_eq!(reply.role(), MessageRole::Assistant);
        assert_eq!(reply.content(), GREETING_REPLY);
    }

    #[tokio::test]
    async fn test_generate_is_deterministic() {
        let model = KeywordChatModel::new();
        let history = vec![Message::user("what about model support")];

        let first = model.generate(&history).await.unwrap();
        let second = model.generate(&history).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.content(), MODEL_REPLY);
    }
}
