//! Conversation messages and the chat model capability

mod message;
mod model;

pub use message::{last_user_content, Message, MessageRole};
pub use model::{ChatModel, MessageStream};

#[cfg(test)]
pub use model::mock::MockChatModel;
