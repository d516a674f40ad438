use std::collections::HashMap;

use async_trait::async_trait;

use super::PromptTemplate;
use crate::domain::chain::Stage;
use crate::domain::{DomainError, Message};

/// Prepends a fixed system message to every sequence it sees.
///
/// The stage is unconditional: it does not look for an existing system
/// message. `ChatChain` enforces the single-system-message rule.
#[derive(Debug, Clone)]
pub struct PromptStage {
    name: String,
    system: Message,
}

impl PromptStage {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            name: "system_prompt".to_string(),
            system: Message::system(system_prompt),
        }
    }

    /// Render `template` once with `variables`; a missing required variable is a compilation error
    pub fn from_template(
        template: &str,
        variables: &HashMap<String, String>,
    ) -> Result<Self, DomainError> {
        let rendered = PromptTemplate::parse(template)
            .and_then(|t| t.render(variables))
            .map_err(|e| DomainError::compilation(format!("system prompt: {}", e)))?;

        Ok(Self::new(rendered))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn system_message(&self) -> &Message {
        &self.system
    }
}

#[async_trait]
impl Stage for PromptStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn injects_system(&self) -> bool {
        true
    }

    async fn apply(&self, input: &[Message]) -> Result<Vec<Message>, DomainError> {
        let mut output = Vec::with_capacity(input.len() + 1);
        output.push(self.system.clone());
        output.extend_from_slice(input);
        Ok(output)
    }
}
