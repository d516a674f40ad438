//! Domain layer - messages, chat model capability and chain composition

pub mod chain;
pub mod error;
pub mod llm;
pub mod prompt;

pub use chain::{ChainBuilder, ChatChain, Shape, Stage};
pub use error::DomainError;
pub use llm::{last_user_content, ChatModel, Message, MessageRole, MessageStream};
pub use prompt::{PromptStage, PromptTemplate, TemplateError};

#[cfg(test)]
pub use llm::MockChatModel;
