//! Shared state handed to every handler

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::domain::ChatChain;

/// Static identity of the running service, fixed at startup
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub name: String,
    pub framework: String,
    pub version: String,
    pub model: String,
}

/// Application state: the compiled chain plus service identity.
///
/// Both are read-only after startup, so cloning the state per request is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub chain: Arc<ChatChain>,
    pub info: Arc<ServiceInfo>,
}

impl AppState {
    pub fn new(chain: ChatChain, service: &ServiceConfig) -> Self {
        let info = ServiceInfo {
            name: service.name.clone(),
            framework: service.framework.clone(),
            version: service.version.clone(),
            model: chain.model_name().to_string(),
        };

        Self {
            chain: Arc::new(chain),
            info: Arc::new(info),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::AppState;
    use crate::config::ServiceConfig;
    use crate::domain::{ChainBuilder, ChatModel, PromptStage};

    /// State with a one-prompt chain compiled against `model`
    pub fn state_with_model(model: Arc<dyn ChatModel>) -> AppState {
        let chain = ChainBuilder::new()
            .append_stage(PromptStage::new("You are a test assistant."))
            .compile(model)
            .unwrap();

        AppState::new(chain, &ServiceConfig::default())
    }
}
