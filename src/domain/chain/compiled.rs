//! Chain compilation and invocation

use std::sync::Arc;

use tracing::{debug, instrument};

use super::{Shape, Stage};
use crate::domain::{ChatModel, DomainError, Message, MessageRole};

/// Ordered list of stages waiting to be compiled against a chat model
#[derive(Debug, Default)]
pub struct ChainBuilder {
    stages: Vec<Arc<dyn Stage>>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn append_shared(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn compile(self, model: Arc<dyn ChatModel>) -> Result<ChatChain, DomainError> {
        ChatChain::compile(self.stages, model)
    }
}

/// A compiled, immutable pipeline of stages ending in a chat model call.
///
/// Safe to share between requests: every invocation works on its own
/// message sequence.
#[derive(Debug)]
pub struct ChatChain {
    stages: Vec<Arc<dyn Stage>>,
    model: Arc<dyn ChatModel>,
    injects_system: bool,
}

impl ChatChain {
    /// Validate the stage layout once, before the chain can ever be invoked
    pub fn compile(
        stages: Vec<Arc<dyn Stage>>,
        model: Arc<dyn ChatModel>,
    ) -> Result<Self, DomainError> {
        if stages.is_empty() {
            return Err(DomainError::compilation("chain has no stages"));
        }

        let mut flowing = Shape::Messages;
        for stage in &stages {
            if stage.input_shape() != flowing {
                return Err(DomainError::compilation(format!(
                    "stage '{}' expects {} but receives {}",
                    stage.name(),
                    stage.input_shape(),
                    flowing
                )));
            }
            flowing = stage.output_shape();
        }

        if flowing != Shape::Messages {
            return Err(DomainError::compilation(format!(
                "model '{}' expects messages but the last stage produces {}",
                model.name(),
                flowing
            )));
        }

        let injectors = stages.iter().filter(|s| s.injects_system()).count();
        if injectors > 1 {
            return Err(DomainError::compilation(format!(
                "{} stages inject a system message, at most one is allowed",
                injectors
            )));
        }

        debug!(
            stages = ?stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            model = %model.name(),
            "Chain compiled"
        );

        Ok(Self {
            stages,
            model,
            injects_system: injectors == 1,
        })
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Run every stage in order, then the model. Either yields exactly one
    /// assistant reply or the first failure, wrapped with the failing stage.
    #[instrument(skip_all, fields(model = %self.model.name(), input_len = input.len()))]
    pub async fn invoke(&self, input: &[Message]) -> Result<Message, DomainError> {
        self.validate_input(input)
            .map_err(|e| DomainError::chain_execution("input", e))?;

        let mut messages = input.to_vec();
        for stage in &self.stages {
            messages = stage
                .apply(&messages)
                .await
                .map_err(|e| DomainError::chain_execution(stage.name(), e))?;

            if messages.is_empty() {
                return Err(DomainError::chain_execution(
                    stage.name(),
                    DomainError::validation("stage produced an empty message sequence"),
                ));
            }

            debug!(stage = %stage.name(), len = messages.len(), "Stage applied");
        }

        let model_stage = format!("model:{}", self.model.name());
        let reply = self
            .model
            .generate(&messages)
            .await
            .map_err(|e| DomainError::chain_execution(&model_stage, e))?;

        if reply.role() != MessageRole::Assistant {
            return Err(DomainError::chain_execution(
                model_stage,
                DomainError::model_unavailable(
                    self.model.name(),
                    format!("expected an assistant reply, got {:?}", reply.role()),
                ),
            ));
        }

        Ok(reply)
    }

    fn validate_input(&self, input: &[Message]) -> Result<(), DomainError> {
        if input.is_empty() {
            return Err(DomainError::validation("input message sequence is empty"));
        }

        if self.injects_system && input.iter().any(Message::is_system) {
            return Err(DomainError::validation(
                "input already contains a system message",
            ));
        }

        Ok(())
    }
}
