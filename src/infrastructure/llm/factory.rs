use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::{KeywordChatModel, OpenAiChatModel};
use crate::config::ModelConfig;
use crate::domain::{ChatModel, DomainError};

/// Builds the single chat model the chain is compiled against
#[derive(Debug)]
pub struct ChatModelFactory;

impl ChatModelFactory {
    pub fn create(config: &ModelConfig) -> Result<Arc<dyn ChatModel>, DomainError> {
        match config {
            ModelConfig::Mock => Ok(Arc::new(KeywordChatModel::new())),

            ModelConfig::OpenAi {
                model,
                base_url,
                api_key,
                temperature,
                timeout_secs,
            } => {
                if model.trim().is_empty() {
                    return Err(DomainError::configuration("model.model must not be empty"));
                }

                if api_key.trim().is_empty() {
                    return Err(DomainError::configuration(format!(
                        "no API key configured for model '{}'",
                        model
                    )));
                }

                let client = HttpClient::with_timeout(Duration::from_secs(*timeout_secs))
                    .map_err(|e| DomainError::configuration(e.to_string()))?;

                let chat_model = OpenAiChatModel::new(client, model, api_key, base_url)
                    .with_temperature(*temperature);

                Ok(Arc::new(chat_model))
            }
        }
    }
}
