use std::fmt::Debug;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use super::Message;
use crate::domain::DomainError;

/// Stream of partial reply messages
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<Message, DomainError>> + Send>>;

/// Capability to produce a reply from an ordered conversation history.
///
/// Implementations are chosen once at construction time and shared across
/// requests, so they must not keep per-request state.
#[async_trait]
pub trait ChatModel: Send + Sync + Debug {
    /// Generate a single assistant reply for the given history
    async fn generate(&self, history: &[Message]) -> Result<Message, DomainError>;

    /// Stream partial replies. Models without streaming support report
    /// `NotSupported` instead of degrading to a single-chunk stream.
    async fn stream(&self, _history: &[Message]) -> Result<MessageStream, DomainError> {
        Err(DomainError::not_supported(self.name(), "stream"))
    }

    /// Name used in logs, errors and the health payload
    fn name(&self) -> &str;
}


#[cfg(test)]
mod tests {
    use super::mock::MockChatModel;
    use super::*;
    use crate::domain::llm::MessageRole;

    #[tokio::test]
    async fn test_stream_defaults_to_not_supported() {
        let model = MockChatModel::new();
        let result = model.stream(&[Message::user("hi")]).await;

        match result {
            Err(DomainError::NotSupported { model, operation }) => {
                assert_eq!(model, "mock");
                assert_eq!(operation, "stream");
            }
            _ => panic!("expected NotSupported"),
        }
    }

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let model = MockChatModel::new();
        let reply = model.generate(&[Message::user("ping")]).await.unwrap();

        assert_eq!(reply.role(), MessageRole::Assistant);
        assert_eq!(reply.content(), "echo: ping");
        assert_eq!(model.calls(), 1);
    }
}
